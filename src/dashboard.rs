//! Dashboard wiring
//!
//! All components share one [`BackendClient`] and one [`Notifier`].

use crate::api::{ApiError, BackendClient};
use crate::config::Config;
use crate::services::{
    BotLifecycleClient, ConfigClient, Notifier, PanelUpdate, ReportsClient, WalletBackup,
    WalletMonitor, WalletRestoreFlow,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Dashboard {
    pub config: Arc<Config>,
    pub client: BackendClient,
    pub notifier: Arc<dyn Notifier>,
    pub config_client: ConfigClient,
    pub bot: BotLifecycleClient,
    pub wallets: WalletMonitor,
    pub reports: ReportsClient,
    pub backup: WalletBackup,
}

impl Dashboard {
    pub fn new(config: Config, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let client = BackendClient::new(&config)?;
        let config_client = ConfigClient::new(client.clone(), config.submit.clone(), notifier.clone());
        let bot = BotLifecycleClient::new(client.clone(), config_client.clone(), notifier.clone());
        let wallets = WalletMonitor::new(client.clone(), config.hide_paid_out);
        let reports = ReportsClient::new(client.clone(), config_client.clone(), notifier.clone());
        let backup = WalletBackup::new(client.clone(), notifier.clone());

        Ok(Self {
            config: Arc::new(config),
            client,
            notifier,
            config_client,
            bot,
            wallets,
            reports,
            backup,
        })
    }

    /// A restore flow that refreshes this dashboard's wallet panel
    pub fn restore_flow(&self) -> WalletRestoreFlow {
        WalletRestoreFlow::new(self.client.clone(), self.wallets.clone(), self.notifier.clone())
    }

    /// Initial load: config and wallets are fetched concurrently and
    /// independently, one failing doesn't hold back the other
    pub async fn load(&self) -> (Result<bool, ApiError>, Result<PanelUpdate, ApiError>) {
        info!("[Dashboard] Loading from {}", self.client.base_url());
        futures::join!(self.config_client.load_config(), self.wallets.load_wallets())
    }
}
