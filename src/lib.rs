//! ADA Accumulation Bot Dashboard
//!
//! Operator client for the accumulation bot backend:
//!
//! 1. **Config sync**: strategy, risk and profit settings are loaded and
//!    submitted as three independent domains.
//! 2. **Bot control**: start/stop, with the run-state always re-read from
//!    the backend afterwards.
//! 3. **Wallet monitoring**: each managed wallet is shown with a tier
//!    (neutral / warning at 80% / success at 100%) derived from its funding
//!    progress, plus wallet restore and backup.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod render;
pub mod services;
pub mod types;

pub use api::{ApiError, BackendClient, FailureKind};
pub use config::Config;
pub use dashboard::Dashboard;
pub use services::{
    BotLifecycleClient, ChartView, ConfigClient, ConsoleNotifier, Notifier, Tier, WalletMonitor,
    WalletRestoreFlow,
};
pub use types::{BotConfig, CandlePoint, RunState, Wallet};
