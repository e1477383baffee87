//! Replay policy for backend requests
//!
//! Snapshot reads (`/config`, `/wallets`, ...) may be repeated after a
//! transient failure. Writes and reads that kick off backend jobs
//! (`/bot/backtest`) go out exactly once, whatever the error.

use super::error::ApiError;
use crate::config::RetryConfig;
use std::future::Future;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

/// Whether a request may be sent again after a transient failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replay {
    /// Repeating the request has no effect on the backend
    Safe,
    /// Sent exactly once
    Once,
}

impl Replay {
    /// Number of extra attempts allowed under `config`
    pub fn budget(&self, config: &RetryConfig) -> u32 {
        match self {
            Replay::Safe => config.max_retries,
            Replay::Once => 0,
        }
    }
}

/// Delay schedule between attempts
#[derive(Debug, Clone)]
struct Backoff {
    next_ms: u64,
    max_ms: u64,
    factor: f64,
}

impl Backoff {
    fn new(config: &RetryConfig) -> Self {
        Self {
            next_ms: config.initial_delay_ms,
            max_ms: config.max_delay_ms,
            factor: config.backoff_factor,
        }
    }

    /// Wait before the next attempt. A 429 means the backend asked us to
    /// slow down, so it gets the longest delay straight away.
    fn delay_after(&mut self, err: &ApiError) -> Duration {
        let ms = if err.status() == Some(429) {
            self.max_ms
        } else {
            self.next_ms
        };
        self.next_ms = ((self.next_ms as f64 * self.factor) as u64).min(self.max_ms);
        Duration::from_millis(ms)
    }
}

/// Run `request` under the replay policy. Only errors with
/// `ApiError::is_retryable()` are retried, and only for `Replay::Safe`.
pub async fn with_replay<T, F, Fut>(
    config: &RetryConfig,
    replay: Replay,
    request_name: &str,
    mut request: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let budget = replay.budget(config);
    let mut backoff = Backoff::new(config);
    let mut retries = 0;

    loop {
        let err = match request().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !err.is_retryable() {
            return Err(err);
        }
        if retries >= budget {
            if budget > 0 {
                warn!("[Replay] {} gave up after {} retries: {}", request_name, retries, err);
            }
            return Err(err);
        }

        retries += 1;
        let delay = backoff.delay_after(&err);
        debug!(
            "[Replay] {} failed ({}), retry {}/{} in {}ms",
            request_name,
            err,
            retries,
            budget,
            delay.as_millis()
        );
        sleep(delay).await;
    }
}
