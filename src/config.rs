//! Configuration management for the dashboard client

use anyhow::Result;
use std::env;
use std::time::Duration;

/// Dashboard configuration loaded from environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the bot backend (no trailing slash)
    pub api_url: String,

    /// Per-request timeout in seconds
    pub http_timeout_seconds: u64,

    /// Wallet panel refresh interval in watch mode
    pub wallet_refresh_seconds: u64,

    /// Ask the backend to leave out wallets whose payout already happened.
    /// Filtering is done server-side; the client never hides wallets itself.
    pub hide_paid_out: bool,

    /// Values sent with every config submission that the operator can't edit
    pub submit: SubmitDefaults,

    /// Retry policy for idempotent reads
    pub retry: RetryConfig,
}

/// Fixed values the client attaches to config submissions
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitDefaults {
    /// Lookback windows paired with level1..3 (default: 4, 3, 2)
    pub lookbacks: [i64; 3],
    /// Fraction of capital risked per trade (default: 0.02)
    pub risk_per_trade: f64,
    /// ADA kept in the bot as base capital (default: 500.0)
    pub reserve_ada: f64,
    /// Whether profits above target are withdrawn automatically (default: true)
    pub auto_withdraw: bool,
}

impl Default for SubmitDefaults {
    fn default() -> Self {
        Self {
            lookbacks: [4, 3, 2],
            risk_per_trade: 0.02,
            reserve_ada: 500.0,
            auto_withdraw: true,
        }
    }
}

/// Retry configuration for reads
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial delay between retries in milliseconds
    pub initial_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_delay_ms: u64,
    /// Backoff multiplier
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay_ms: 200,
            max_delay_ms: 2000,
            backoff_factor: 2.0,
        }
    }
}

impl Config {
    pub const DEFAULT_API_URL: &'static str = "http://127.0.0.1:8000";

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let api_url = env::var("DASHBOARD_API_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_API_URL.to_string());

        let http_timeout_seconds = env::var("HTTP_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let wallet_refresh_seconds = env::var("WALLET_REFRESH_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(15);

        let hide_paid_out = env::var("HIDE_PAID_OUT_WALLETS")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        let config = Self {
            http_timeout_seconds,
            wallet_refresh_seconds,
            hide_paid_out,
            ..Self::with_api_url(&api_url)
        };
        config.validate()?;
        Ok(config)
    }

    /// Configuration with defaults pointing at the given backend
    pub fn with_api_url(api_url: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            http_timeout_seconds: 30,
            wallet_refresh_seconds: 15,
            hide_paid_out: false,
            submit: SubmitDefaults::default(),
            retry: RetryConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            anyhow::bail!("DASHBOARD_API_URL must be an http(s) URL, got '{}'", self.api_url);
        }
        if self.http_timeout_seconds == 0 {
            anyhow::bail!("HTTP_TIMEOUT_SECONDS must be greater than zero");
        }
        if self.wallet_refresh_seconds == 0 {
            anyhow::bail!("WALLET_REFRESH_SECONDS must be greater than zero");
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    pub fn wallet_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.wallet_refresh_seconds)
    }
}
