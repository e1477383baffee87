//! Backend error differentiation
//!
//! Every request the dashboard makes ends in either a transport failure (no
//! response at all) or an application failure (a response with a non-success
//! status, usually carrying a `{"detail": ...}` body).

use serde::Deserialize;
use thiserror::Error;

/// Coarse failure class shown to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Application,
}

/// Structured backend error
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Request never completed (connect refused, timeout, DNS, ...)
    #[error("{0}")]
    Transport(String),
    /// Backend answered with a non-success status or an error payload
    #[error("{detail}")]
    Application { status: u16, detail: String },
    /// Backend answered successfully but the body didn't match the contract
    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// Error body format used by the backend
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

impl ApiError {
    /// Parse a non-success response into a structured error
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|parsed| parsed.detail)
            .map(|detail| match detail {
                serde_json::Value::String(s) => s,
                // Validation errors come back as a list of objects
                other => other.to_string(),
            })
            .unwrap_or_else(|| {
                let body = body.trim();
                if body.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.to_string()
                }
            });

        ApiError::Application { status, detail }
    }

    /// Parse a network/reqwest error
    pub fn from_network_error(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Transport("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Transport(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Transport(_) => FailureKind::Transport,
            ApiError::Application { .. } | ApiError::Decode(_) => FailureKind::Application,
        }
    }

    /// Whether a read may be retried with backoff
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Application { status, .. } => matches!(status, 429 | 502 | 503 | 504),
            ApiError::Decode(_) => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Application { status, .. } => Some(*status),
            _ => None,
        }
    }
}
