//! Operator notifications
//!
//! Every write operation hands its result to a [`Notifier`] instead of popping
//! a blocking dialog.

use crate::api::{ApiError, FailureKind};
use colored::Colorize;
use tracing::debug;

/// One message for the operator
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Success(String),
    Failure { kind: FailureKind, message: String },
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Success(text) => text,
            Notice::Failure { message, .. } => message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Notice::Success(_))
    }

    /// Failure notice; transport errors get the raw error, application
    /// errors are prefixed with what was being attempted
    pub fn from_error(action: &str, err: &ApiError) -> Self {
        let message = match err.kind() {
            FailureKind::Transport => format!("Error: {}", err),
            FailureKind::Application => format!("{} Failed: {}", action, err),
        };
        Notice::Failure {
            kind: err.kind(),
            message,
        }
    }
}

/// Sink for operator notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Report the outcome of a write operation through any notifier
pub fn report<T>(notifier: &dyn Notifier, action: &str, success_text: &str, result: &Result<T, ApiError>) {
    match result {
        Ok(_) => notifier.notify(Notice::Success(success_text.to_string())),
        Err(err) => notifier.notify(Notice::from_error(action, err)),
    }
}

/// Prints notices to the terminal
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match &notice {
            Notice::Success(text) => {
                debug!("[Notify] {}", text);
                println!("{} {}", "✔".green().bold(), text.green());
            }
            Notice::Failure { kind, message } => {
                debug!("[Notify] {:?} failure: {}", kind, message);
                println!("{} {}", "✘".red().bold(), message.red());
            }
        }
    }
}

/// Keeps notices in memory for tests
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    notices: std::sync::Arc<std::sync::Mutex<Vec<Notice>>>,
}

#[cfg(test)]
impl MemoryNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn last_text(&self) -> Option<String> {
        self.notices().last().map(|n| n.text().to_string())
    }
}

#[cfg(test)]
impl Notifier for MemoryNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}
