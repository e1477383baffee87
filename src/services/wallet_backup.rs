//! Wallet backup download

use super::notifier::{report, Notifier};
use crate::api::{ApiError, BackendClient, Endpoints};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct WalletBackup {
    client: BackendClient,
    notifier: Arc<dyn Notifier>,
}

impl WalletBackup {
    pub fn new(client: BackendClient, notifier: Arc<dyn Notifier>) -> Self {
        Self { client, notifier }
    }

    /// Default file name for a wallet's backup, `backup_<name>.key`
    pub fn default_file_name(wallet_name: &str) -> String {
        format!("backup_{}.key", wallet_name.replace(' ', "_"))
    }

    /// Download the encrypted backup of a wallet
    pub async fn download(&self, wallet_name: &str) -> Result<Vec<u8>, ApiError> {
        let result = self
            .client
            .post_for_bytes(&Endpoints::wallet_backup(wallet_name))
            .await;
        report(self.notifier.as_ref(), "Backup", "Wallet backup downloaded", &result);
        result
    }

    /// Download and write the backup with owner-only permissions
    pub async fn backup_to(&self, wallet_name: &str, out: Option<&Path>) -> Result<PathBuf> {
        let bytes = self.download(wallet_name).await?;
        let path = out
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(Self::default_file_name(wallet_name)));

        write_private(&path, &bytes)
            .await
            .with_context(|| format!("Failed to write backup to {}", path.display()))?;

        info!("[WalletBackup] '{}' saved to {} ({} bytes)", wallet_name, path.display(), bytes.len());
        Ok(path)
    }
}

/// Write `bytes` to `path`, readable by the owner only. A fresh file is
/// created as 0o600; an existing one is narrowed to 0o600 before any byte
/// of the key lands in it.
#[cfg(unix)]
async fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    use tokio::io::AsyncWriteExt;

    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .await?;
    file.set_permissions(std::fs::Permissions::from_mode(0o600)).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

#[cfg(not(unix))]
async fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(path, bytes).await
}
