//! Bot start/stop commands
//!
//! No run-state is cached here. After every command, successful or not, the
//! config is reloaded so the badge shows whatever the backend now reports.

use super::config_client::ConfigClient;
use super::notifier::{report, Notifier};
use crate::api::{ApiError, BackendClient, Endpoints};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct BotLifecycleClient {
    client: BackendClient,
    config: ConfigClient,
    notifier: Arc<dyn Notifier>,
}

impl BotLifecycleClient {
    pub fn new(client: BackendClient, config: ConfigClient, notifier: Arc<dyn Notifier>) -> Self {
        Self { client, config, notifier }
    }

    /// Ask the backend to start the bot. Sent even if it already runs;
    /// rejecting a double start is the backend's call.
    pub async fn start(&self) -> Result<(), ApiError> {
        self.command("Start", "Bot start requested", Endpoints::BOT_START).await
    }

    pub async fn stop(&self) -> Result<(), ApiError> {
        self.command("Stop", "Bot stop requested", Endpoints::BOT_STOP).await
    }

    async fn command(&self, action: &str, success_text: &str, path: &str) -> Result<(), ApiError> {
        info!("[BotLifecycle] {} command", action);
        let result = self.client.post_empty(path).await.map(|_| ());
        report(self.notifier.as_ref(), action, success_text, &result);

        if let Err(e) = self.config.load_config().await {
            warn!("[BotLifecycle] Config reload after {} failed: {}", action.to_lowercase(), e);
        }
        result
    }
}
