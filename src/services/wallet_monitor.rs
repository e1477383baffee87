//! Wallet progress monitoring
//!
//! Fetches the wallet snapshot from the backend and keeps the wallet panel
//! view model. Each wallet gets a visual tier from its funding progress:
//!
//! - `progress >= 100`       → Success (green border + glow)
//! - `80 <= progress < 100`  → Warning (amber border + glow)
//! - `progress < 80`         → Neutral
//!
//! Every wallet the backend returns is shown. Hiding paid-out wallets is a
//! backend decision, requested through the `hide_paid_out` query flag.

use super::sequence::{Sequenced, Ticket};
use crate::api::{ApiError, BackendClient, Endpoints};
use crate::types::Wallet;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Visual classification of a wallet's funding progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    Neutral,
    Warning,
    Success,
}

impl Tier {
    pub const WARNING_THRESHOLD: f64 = 80.0;
    pub const SUCCESS_THRESHOLD: f64 = 100.0;

    /// Tier for a progress percentage; boundaries belong to the higher tier
    pub fn from_progress(progress_pct: f64) -> Self {
        if progress_pct >= Self::SUCCESS_THRESHOLD {
            Tier::Success
        } else if progress_pct >= Self::WARNING_THRESHOLD {
            Tier::Warning
        } else {
            Tier::Neutral
        }
    }

    pub fn border_color(&self) -> &'static str {
        match self {
            Tier::Success => "var(--success)",
            Tier::Warning => "#ffcc00",
            Tier::Neutral => "var(--glass-border)",
        }
    }

    pub fn glow(&self) -> &'static str {
        match self {
            Tier::Success => "0 0 15px var(--success)",
            Tier::Warning => "0 0 10px #ffcc00",
            Tier::Neutral => "none",
        }
    }
}

/// Progress bar fill in percent, `min(progress, 100)`; NaN draws as empty
pub fn bar_width(progress_pct: f64) -> f64 {
    if progress_pct.is_nan() {
        0.0
    } else {
        progress_pct.min(100.0)
    }
}

/// One rendered row of the wallet panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletItem {
    pub name: String,
    pub address: String,
    pub tier: Tier,
    pub border_color: &'static str,
    pub glow: &'static str,
    pub bar_width_pct: f64,
    /// Balance rounded to one decimal
    pub balance_display: String,
    /// Target as sent by the backend, unrounded
    pub target_display: String,
    pub progress_pct: f64,
    /// QR image of the receiving address, served by the backend
    pub qr_url: String,
}

impl WalletItem {
    pub fn from_wallet(wallet: &Wallet, base_url: &str) -> Self {
        let tier = Tier::from_progress(wallet.progress_pct);
        Self {
            name: wallet.name.clone(),
            address: wallet.address.clone(),
            tier,
            border_color: tier.border_color(),
            glow: tier.glow(),
            bar_width_pct: bar_width(wallet.progress_pct),
            balance_display: format!("{:.1}", wallet.balance_ada),
            target_display: wallet.target_ada.to_string(),
            progress_pct: wallet.progress_pct,
            qr_url: format!("{}{}", base_url, Endpoints::qr(&wallet.name)),
        }
    }

    /// `"12.3 / 100 ADA"`
    pub fn amount_label(&self) -> String {
        format!("{} / {} ADA", self.balance_display, self.target_display)
    }
}

/// Keys touched by the last panel update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelChanges {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<String>,
}

impl PanelChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// Wallet panel view model, in backend order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WalletPanel {
    pub items: Vec<WalletItem>,
}

impl WalletPanel {
    /// Replace the panel with a new snapshot, reconciled by wallet name.
    ///
    /// The resulting items are exactly the snapshot; the returned changes let
    /// a renderer patch only the rows that differ.
    pub fn reconcile(&mut self, snapshot: Vec<WalletItem>) -> PanelChanges {
        let previous: HashMap<&str, &WalletItem> =
            self.items.iter().map(|item| (item.name.as_str(), item)).collect();

        let mut changes = PanelChanges::default();
        for item in &snapshot {
            match previous.get(item.name.as_str()) {
                None => changes.added.push(item.name.clone()),
                Some(old) if *old != item => changes.changed.push(item.name.clone()),
                Some(_) => {}
            }
        }

        let current: HashMap<&str, ()> = snapshot.iter().map(|item| (item.name.as_str(), ())).collect();
        changes.removed = self
            .items
            .iter()
            .filter(|item| !current.contains_key(item.name.as_str()))
            .map(|item| item.name.clone())
            .collect();

        self.items = snapshot;
        changes
    }

    pub fn get(&self, name: &str) -> Option<&WalletItem> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Result of one wallet fetch
#[derive(Debug, Clone, PartialEq)]
pub enum PanelUpdate {
    Applied(PanelChanges),
    /// A newer fetch was issued while this one was in flight
    Stale,
}

/// Fetches wallets and owns the panel view model
#[derive(Clone)]
pub struct WalletMonitor {
    client: BackendClient,
    hide_paid_out: bool,
    panel: Arc<Sequenced<WalletPanel>>,
}

impl WalletMonitor {
    pub fn new(client: BackendClient, hide_paid_out: bool) -> Self {
        Self {
            client,
            hide_paid_out,
            panel: Sequenced::new("WalletMonitor"),
        }
    }

    /// Fetch the wallet snapshot and rebuild the panel from it
    pub async fn load_wallets(&self) -> Result<PanelUpdate, ApiError> {
        let ticket = self.panel.issue();
        let wallets = self.fetch().await?;
        Ok(self.apply(ticket, wallets).await)
    }

    /// Take a ticket for a fetch that will be applied with [`Self::apply`]
    pub fn begin_fetch(&self) -> Ticket {
        self.panel.issue()
    }

    pub async fn fetch(&self) -> Result<Vec<Wallet>, ApiError> {
        let query: &[(&str, &str)] = if self.hide_paid_out {
            &[("hide_paid_out", "true")]
        } else {
            &[]
        };
        self.client.get_json_with_query(Endpoints::WALLETS, query).await
    }

    /// Apply a fetched snapshot unless a newer fetch superseded it
    pub async fn apply(&self, ticket: Ticket, wallets: Vec<Wallet>) -> PanelUpdate {
        let base_url = self.client.base_url();
        let snapshot: Vec<WalletItem> = wallets
            .iter()
            .map(|wallet| WalletItem::from_wallet(wallet, base_url))
            .collect();
        let count = snapshot.len();

        let applied = self
            .panel
            .apply_with(ticket, |panel| panel.get_or_insert_with(WalletPanel::default).reconcile(snapshot))
            .await;

        match applied {
            Some(changes) => {
                if changes.is_empty() {
                    debug!("[WalletMonitor] {} wallets, no changes", count);
                } else {
                    info!(
                        "[WalletMonitor] {} wallets (+{} -{} ~{})",
                        count,
                        changes.added.len(),
                        changes.removed.len(),
                        changes.changed.len()
                    );
                }
                PanelUpdate::Applied(changes)
            }
            None => PanelUpdate::Stale,
        }
    }

    /// Current panel; empty until the first fetch lands
    pub async fn panel(&self) -> WalletPanel {
        self.panel.get().await.unwrap_or_default()
    }
}
