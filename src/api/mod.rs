//! Client side of the bot backend HTTP API

pub mod client;
pub mod error;
pub mod retry;

#[cfg(test)]
pub(crate) mod test_backend;

pub use client::{BackendClient, Endpoints};
pub use error::{ApiError, FailureKind};
pub use retry::Replay;
