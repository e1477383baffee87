//! Read-only reports and long-running bot jobs (trades, balances, optimizer,
//! backtest)

use super::config_client::ConfigClient;
use super::notifier::{report, Notifier};
use crate::api::{ApiError, BackendClient, Endpoints};
use crate::types::{ProfitBalances, RecentTrades};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Metrics of one backtest run against the current config
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BacktestReport {
    #[serde(default)]
    pub equity_curve: Vec<f64>,
    /// Everything else the engine reports (win rate, drawdown, ...)
    #[serde(flatten)]
    pub metrics: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct BacktestResponse {
    status: String,
    #[serde(default)]
    result: Option<BacktestReport>,
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OptimizeResponse {
    #[serde(default)]
    params: Value,
}

#[derive(Clone)]
pub struct ReportsClient {
    client: BackendClient,
    config: ConfigClient,
    notifier: Arc<dyn Notifier>,
}

impl ReportsClient {
    pub fn new(client: BackendClient, config: ConfigClient, notifier: Arc<dyn Notifier>) -> Self {
        Self { client, config, notifier }
    }

    /// Tail of the bot's trade log
    pub async fn recent_trades(&self) -> Result<Vec<String>, ApiError> {
        let trades: RecentTrades = self.client.get_json(Endpoints::TRADES).await?;
        Ok(trades.recent_trades)
    }

    pub async fn profit_balances(&self) -> Result<ProfitBalances, ApiError> {
        self.client.get_json(Endpoints::PROFIT).await
    }

    /// Run the strategy optimizer. The backend rewrites its config with the
    /// best parameters, so the config view is reloaded afterwards.
    pub async fn optimize(&self) -> Result<Value, ApiError> {
        info!("[Reports] Optimization requested");
        let result = self
            .client
            .post_empty(Endpoints::BOT_OPTIMIZE)
            .await
            .and_then(|body| {
                serde_json::from_value::<OptimizeResponse>(body)
                    .map(|r| r.params)
                    .map_err(|e| ApiError::Decode(e.to_string()))
            });
        report(self.notifier.as_ref(), "Optimization", "Strategy optimized", &result);

        if result.is_ok() {
            if let Err(e) = self.config.load_config().await {
                warn!("[Reports] Config reload after optimization failed: {}", e);
            }
        }
        result
    }

    /// Backtest the current config. Runs a job on the backend, so it is never
    /// retried. A `{"status": "error"}` body is reported as an application
    /// failure even though it comes with a 200.
    pub async fn backtest(&self) -> Result<BacktestReport, ApiError> {
        info!("[Reports] Backtest requested");
        let response: BacktestResponse = self.client.get_json_once(Endpoints::BOT_BACKTEST).await?;

        match (response.status.as_str(), response.result) {
            ("success", Some(report)) => Ok(report),
            _ => Err(ApiError::Application {
                status: 200,
                detail: response
                    .detail
                    .unwrap_or_else(|| format!("backtest returned status '{}'", response.status)),
            }),
        }
    }
}
