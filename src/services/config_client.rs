//! Config synchronization with the backend
//!
//! The bot config is split into three domains (strategy, risk, profit) that
//! are submitted independently, so tuning one never resends the others.

use super::notifier::{report, Notifier};
use super::sequence::Sequenced;
use crate::api::{ApiError, BackendClient, Endpoints};
use crate::config::SubmitDefaults;
use crate::types::{BotConfig, ProfitConfig, RiskConfig, RunState, StrategyConfig};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Status badge as shown next to the bot controls
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusBadge {
    pub text: String,
    pub class: String,
}

impl StatusBadge {
    pub fn from_state(state: &RunState) -> Self {
        Self {
            text: state.as_str().to_string(),
            class: state.badge_class(),
        }
    }
}

/// Form fields populated from the backend config
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigView {
    pub run_state: RunState,
    pub badge: StatusBadge,
    pub level1: i64,
    pub level2: i64,
    pub level3: i64,
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    pub target_ada: f64,
    pub withdraw_address: String,
}

impl From<BotConfig> for ConfigView {
    fn from(config: BotConfig) -> Self {
        Self {
            badge: StatusBadge::from_state(&config.status),
            run_state: config.status,
            level1: config.strategy.level1,
            level2: config.strategy.level2,
            level3: config.strategy.level3,
            stop_loss_pct: config.risk.stop_loss_pct,
            take_profit_pct: config.risk.take_profit_pct,
            target_ada: config.profit.target_ada,
            withdraw_address: config.profit.withdraw_address,
        }
    }
}

/// Loads and submits the bot configuration
#[derive(Clone)]
pub struct ConfigClient {
    client: BackendClient,
    defaults: SubmitDefaults,
    notifier: Arc<dyn Notifier>,
    view: Arc<Sequenced<ConfigView>>,
}

impl ConfigClient {
    pub fn new(client: BackendClient, defaults: SubmitDefaults, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            defaults,
            notifier,
            view: Sequenced::new("ConfigClient"),
        }
    }

    /// Fetch the current config and populate the view.
    /// Returns false if a newer load superseded this one.
    pub async fn load_config(&self) -> Result<bool, ApiError> {
        let ticket = self.view.issue();
        let config: BotConfig = match self.client.get_json(Endpoints::CONFIG).await {
            Ok(config) => config,
            Err(e) => {
                warn!("[ConfigClient] Failed to load config: {}", e);
                return Err(e);
            }
        };

        let status = config.status.clone();
        let applied = self.view.apply(ticket, ConfigView::from(config)).await;
        if applied {
            info!("[ConfigClient] Config loaded, bot is {}", status);
        }
        Ok(applied)
    }

    /// Submit strategy levels; lookbacks always go along with the fixed defaults
    pub async fn submit_strategy(&self, level1: i64, level2: i64, level3: i64) -> Result<(), ApiError> {
        let [lookback1, lookback2, lookback3] = self.defaults.lookbacks;
        let body = StrategyConfig {
            level1,
            level2,
            level3,
            lookback1,
            lookback2,
            lookback3,
        };
        self.submit("Strategy update", "Strategy Updated!", Endpoints::CONFIG_STRATEGY, &body)
            .await
    }

    pub async fn submit_risk(&self, stop_loss_pct: f64, take_profit_pct: f64) -> Result<(), ApiError> {
        let body = RiskConfig {
            stop_loss_pct,
            take_profit_pct,
            risk_per_trade: self.defaults.risk_per_trade,
        };
        self.submit("Risk update", "Risk Config Updated!", Endpoints::CONFIG_RISK, &body)
            .await
    }

    pub async fn submit_profit(&self, target_ada: f64, withdraw_address: &str) -> Result<(), ApiError> {
        let body = ProfitConfig {
            target_ada,
            reserve_ada: self.defaults.reserve_ada,
            auto_withdraw: self.defaults.auto_withdraw,
            withdraw_address: withdraw_address.to_string(),
        };
        self.submit("Profit update", "Profit Settings Saved!", Endpoints::CONFIG_PROFIT, &body)
            .await
    }

    /// POST one domain and report the outcome; the view is left untouched
    async fn submit<B: Serialize>(
        &self,
        action: &str,
        success_text: &str,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let result = self.client.post_json(path, body).await.map(|_| ());
        if let Err(e) = &result {
            warn!("[ConfigClient] {} failed: {}", action, e);
        }
        report(self.notifier.as_ref(), action, success_text, &result);
        result
    }

    /// Current view; `None` until the first load lands
    pub async fn view(&self) -> Option<ConfigView> {
        self.view.get().await
    }
}
