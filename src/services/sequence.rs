//! Last-request-wins store for fetched resources
//!
//! Every fetch takes a ticket before it is sent. When the response arrives it
//! is applied only if no newer fetch of the same resource was issued in the
//! meantime, so a slow stale response can never overwrite fresher data.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Ticket handed out for one fetch of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

/// Sequenced view of one resource
#[derive(Debug)]
pub struct Sequenced<T> {
    name: &'static str,
    issued: AtomicU64,
    current: RwLock<Option<T>>,
}

impl<T: Clone> Sequenced<T> {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            issued: AtomicU64::new(0),
            current: RwLock::new(None),
        })
    }

    /// Issue the next ticket for this resource
    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Most recently issued ticket, if any
    pub fn latest(&self) -> Option<Ticket> {
        match self.issued.load(Ordering::SeqCst) {
            0 => None,
            seq => Some(Ticket(seq)),
        }
    }

    /// Apply `update` to the stored value if `ticket` is still the latest.
    /// Returns `None` when the response was stale and got discarded.
    pub async fn apply_with<R>(&self, ticket: Ticket, update: impl FnOnce(&mut Option<T>) -> R) -> Option<R> {
        let mut current = self.current.write().await;
        // Checked under the write lock so two completions can't both pass
        if self.latest() != Some(ticket) {
            debug!(
                "[{}] Discarding stale response #{} (latest #{})",
                self.name,
                ticket.seq(),
                self.issued.load(Ordering::SeqCst)
            );
            return None;
        }
        Some(update(&mut current))
    }

    /// Replace the stored value if `ticket` is still the latest
    pub async fn apply(&self, ticket: Ticket, value: T) -> bool {
        self.apply_with(ticket, |current| *current = Some(value)).await.is_some()
    }

    pub async fn get(&self) -> Option<T> {
        self.current.read().await.clone()
    }

    /// Mutate the stored value regardless of tickets (local-only edits)
    pub async fn update<R>(&self, f: impl FnOnce(&mut Option<T>) -> R) -> R {
        f(&mut *self.current.write().await)
    }
}
