//! Core types shared between the backend contract and the view models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend-reported lifecycle status of the bot.
///
/// The known states get dedicated styling; anything else the backend sends is
/// kept verbatim so it still shows up (unstyled) in the badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunState {
    Running,
    Stopped,
    Other(String),
}

impl RunState {
    pub fn as_str(&self) -> &str {
        match self {
            RunState::Running => "RUNNING",
            RunState::Stopped => "STOPPED",
            RunState::Other(s) => s,
        }
    }

    /// CSS class of the status badge, `status-<lowercased status>`
    pub fn badge_class(&self) -> String {
        format!("status-{}", self.as_str().to_lowercase())
    }
}

impl From<String> for RunState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "RUNNING" => RunState::Running,
            "STOPPED" => RunState::Stopped,
            _ => RunState::Other(s),
        }
    }
}

impl From<RunState> for String {
    fn from(state: RunState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strategy thresholds; level_i is evaluated over lookback_i candles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub level1: i64,
    pub level2: i64,
    pub level3: i64,
    pub lookback1: i64,
    pub lookback2: i64,
    pub lookback3: i64,
}

/// Risk limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    pub risk_per_trade: f64,
}

/// Profit withdrawal rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitConfig {
    pub target_ada: f64,
    pub reserve_ada: f64,
    pub auto_withdraw: bool,
    pub withdraw_address: String,
}

/// `GET /config` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotConfig {
    pub status: RunState,
    pub strategy: StrategyLevels,
    pub risk: RiskLimits,
    pub profit: ProfitTarget,
}

/// The editable part of the strategy as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyLevels {
    pub level1: i64,
    pub level2: i64,
    pub level3: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskLimits {
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitTarget {
    pub target_ada: f64,
    #[serde(default)]
    pub withdraw_address: String,
}

/// A managed wallet as listed by `GET /wallets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub name: String,
    pub address: String,
    pub balance_ada: f64,
    pub target_ada: f64,
    /// Backend-computed `balance / target * 100`; never recomputed here
    pub progress_pct: f64,
}

/// One OHLC candle, `time` in Unix seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandlePoint {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl CandlePoint {
    /// `low <= min(open, close)` and `high >= max(open, close)`
    pub fn brackets_body(&self) -> bool {
        self.low <= self.open.min(self.close) && self.high >= self.open.max(self.close)
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }
}

/// `GET /trades` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentTrades {
    #[serde(default)]
    pub recent_trades: Vec<String>,
}

/// `GET /profit` response: the bot's virtual balances
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfitBalances {
    pub usdc: f64,
    pub ada: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_state_parsing() {
        let state: RunState = serde_json::from_str(r#""RUNNING""#).unwrap();
        assert_eq!(state, RunState::Running);
        assert_eq!(state.badge_class(), "status-running");

        let state: RunState = serde_json::from_str(r#""PAUSED""#).unwrap();
        assert_eq!(state, RunState::Other("PAUSED".to_string()));
        assert_eq!(state.badge_class(), "status-paused");
        assert_eq!(serde_json::to_string(&state).unwrap(), r#""PAUSED""#);
    }

    #[test]
    fn test_bot_config_parsing() {
        let body = r#"{
            "status": "STOPPED",
            "strategy": {"level1": 9, "level2": 12, "level3": 14},
            "risk": {"stop_loss_pct": 0.012, "take_profit_pct": 0.03, "risk_per_trade": 0.02},
            "profit": {"target_ada": 100.0, "reserve_ada": 10.0, "withdraw_address": "addr_test1"}
        }"#;
        let config: BotConfig = serde_json::from_str(body).unwrap();
        assert_eq!(config.status, RunState::Stopped);
        assert_eq!(config.strategy.level3, 14);
        assert_eq!(config.risk.take_profit_pct, 0.03);
        assert_eq!(config.profit.withdraw_address, "addr_test1");
    }

    #[test]
    fn test_candle_brackets_body() {
        let good = CandlePoint { time: 0, open: 1.05, high: 1.09, low: 1.0, close: 1.07 };
        assert!(good.brackets_body());
        assert!(good.is_bullish());

        let bad = CandlePoint { time: 0, open: 1.05, high: 1.06, low: 1.0, close: 1.07 };
        assert!(!bad.brackets_body());
    }
}
