//! Wallet restore from a backup file
//!
//! State machine: `Idle → Submitting → {Succeeded, Failed} → Idle`.
//! An empty file selection is a silent no-op, not an error.

use super::notifier::{Notice, Notifier};
use super::wallet_monitor::WalletMonitor;
use crate::api::{ApiError, BackendClient, Endpoints};
use reqwest::multipart::{Form, Part};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreState {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// A file picked by the operator
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Restore form fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoreForm {
    pub wallet_name: String,
    pub file: Option<SelectedFile>,
}

impl RestoreForm {
    pub fn is_empty(&self) -> bool {
        self.wallet_name.is_empty() && self.file.is_none()
    }
}

#[derive(Debug, Clone)]
pub enum RestoreOutcome {
    /// No file selected, nothing sent
    Skipped,
    Restored,
    Failed(ApiError),
}

pub struct WalletRestoreFlow {
    client: BackendClient,
    monitor: WalletMonitor,
    notifier: Arc<dyn Notifier>,
    state: RestoreState,
    form: RestoreForm,
    history: Vec<RestoreState>,
}

impl WalletRestoreFlow {
    pub fn new(client: BackendClient, monitor: WalletMonitor, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            monitor,
            notifier,
            state: RestoreState::Idle,
            form: RestoreForm::default(),
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> RestoreState {
        self.state
    }

    /// States passed through since the flow was created
    pub fn history(&self) -> &[RestoreState] {
        &self.history
    }

    pub fn form(&self) -> &RestoreForm {
        &self.form
    }

    /// Fill the form and submit it
    pub async fn restore(&mut self, wallet_name: &str, file: Option<SelectedFile>) -> RestoreOutcome {
        self.form = RestoreForm {
            wallet_name: wallet_name.to_string(),
            file,
        };
        self.submit().await
    }

    /// Submit the current form
    pub async fn submit(&mut self) -> RestoreOutcome {
        let Some(file) = self.form.file.clone() else {
            return RestoreOutcome::Skipped;
        };
        let wallet_name = self.form.wallet_name.clone();

        self.transition(RestoreState::Submitting);
        info!("[WalletRestore] Restoring '{}' from {}", wallet_name, file.file_name);

        let form = Form::new()
            .text("wallet_name", wallet_name.clone())
            .part("file", Part::bytes(file.bytes).file_name(file.file_name));

        let outcome = match self.client.post_multipart(Endpoints::WALLET_RESTORE, form).await {
            Ok(_) => {
                self.transition(RestoreState::Succeeded);
                self.notifier
                    .notify(Notice::Success("Wallet Restored Successfully!".to_string()));
                if let Err(e) = self.monitor.load_wallets().await {
                    warn!("[WalletRestore] Wallet refresh after restore failed: {}", e);
                }
                self.form = RestoreForm::default();
                RestoreOutcome::Restored
            }
            Err(e) => {
                self.transition(RestoreState::Failed);
                warn!("[WalletRestore] Restore of '{}' failed: {}", wallet_name, e);
                self.notifier.notify(Notice::from_error("Restore", &e));
                RestoreOutcome::Failed(e)
            }
        };

        self.transition(RestoreState::Idle);
        outcome
    }

    fn transition(&mut self, next: RestoreState) {
        self.state = next;
        self.history.push(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_backend::{spawn_backend, unreachable_url, FakeState};
    use crate::api::FailureKind;
    use crate::config::Config;
    use crate::services::notifier::MemoryNotifier;

    fn flow_for(url: &str) -> (WalletRestoreFlow, WalletMonitor, MemoryNotifier) {
        let mut config = Config::with_api_url(url);
        config.retry.max_retries = 0;
        let client = BackendClient::new(&config).unwrap();
        let monitor = WalletMonitor::new(client.clone(), false);
        let notifier = MemoryNotifier::default();
        let flow = WalletRestoreFlow::new(client, monitor.clone(), Arc::new(notifier.clone()));
        (flow, monitor, notifier)
    }

    fn backup_file() -> SelectedFile {
        SelectedFile {
            file_name: "backup_wallet-7.key".to_string(),
            bytes: b"encrypted-mnemonic".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_no_file_sends_nothing() {
        let backend = spawn_backend(FakeState::default()).await;
        let (mut flow, _, notifier) = flow_for(&backend.base_url);

        let outcome = flow.restore("wallet-7", None).await;

        assert!(matches!(outcome, RestoreOutcome::Skipped));
        assert_eq!(backend.total_hits(), 0);
        assert!(notifier.notices().is_empty());
        assert!(flow.history().is_empty());
        assert_eq!(flow.form().wallet_name, "wallet-7");
    }

    #[tokio::test]
    async fn test_successful_restore_refreshes_and_resets() {
        let backend = spawn_backend(FakeState::default()).await;
        let (mut flow, monitor, notifier) = flow_for(&backend.base_url);

        let outcome = flow.restore("wallet-7", Some(backup_file())).await;
        assert!(matches!(outcome, RestoreOutcome::Restored));

        let request = backend.with_state(|s| s.restore_requests[0].clone());
        assert_eq!(request.wallet_name, "wallet-7");
        assert_eq!(request.file_name, "backup_wallet-7.key");
        assert_eq!(request.bytes, b"encrypted-mnemonic".to_vec());

        assert_eq!(notifier.last_text().unwrap(), "Wallet Restored Successfully!");
        assert_eq!(backend.hits("GET /wallets"), 1);
        assert!(monitor.panel().await.get("wallet-7").is_some());
        assert!(flow.form().is_empty());
        assert_eq!(
            flow.history(),
            &[RestoreState::Submitting, RestoreState::Succeeded, RestoreState::Idle]
        );
    }

    #[tokio::test]
    async fn test_rejected_restore_keeps_form() {
        let backend = spawn_backend(FakeState {
            restore_error: Some("bad file".to_string()),
            ..Default::default()
        })
        .await;
        let (mut flow, _, notifier) = flow_for(&backend.base_url);

        let outcome = flow.restore("wallet-7", Some(backup_file())).await;

        match outcome {
            RestoreOutcome::Failed(e) => assert_eq!(e.kind(), FailureKind::Application),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(notifier.last_text().unwrap(), "Restore Failed: bad file");
        assert_eq!(flow.form().wallet_name, "wallet-7");
        assert_eq!(flow.form().file, Some(backup_file()));
        assert_eq!(backend.hits("GET /wallets"), 0);
        assert_eq!(flow.state(), RestoreState::Idle);
        assert!(flow.history().contains(&RestoreState::Failed));
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces_raw_error() {
        let (mut flow, _, notifier) = flow_for(&unreachable_url().await);

        let outcome = flow.restore("wallet-7", Some(backup_file())).await;

        assert!(matches!(outcome, RestoreOutcome::Failed(ApiError::Transport(_))));
        assert!(notifier.last_text().unwrap().starts_with("Error: "));
        assert!(!flow.form().is_empty());
    }
}
