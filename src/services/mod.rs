//! Dashboard components talking to the bot backend

pub mod bot_lifecycle;
pub mod chart;
pub mod config_client;
pub mod notifier;
pub mod reports;
pub mod sequence;
pub mod wallet_backup;
pub mod wallet_monitor;
pub mod wallet_restore;

pub use bot_lifecycle::BotLifecycleClient;
pub use chart::{placeholder_series, ChartError, ChartView};
pub use config_client::{ConfigClient, ConfigView, StatusBadge};
pub use notifier::{ConsoleNotifier, Notice, Notifier};
pub use reports::{BacktestReport, ReportsClient};
pub use wallet_backup::WalletBackup;
pub use wallet_monitor::{PanelChanges, PanelUpdate, Tier, WalletItem, WalletMonitor, WalletPanel};
pub use wallet_restore::{RestoreForm, RestoreOutcome, RestoreState, SelectedFile, WalletRestoreFlow};
