//! Classified request errors.
//!
//! The pipeline in [`crate::http`] is the only producer of [`ApiError`]:
//! every failed request is classified exactly once at that boundary, and
//! facades/callers propagate the value untouched. Nothing downstream is
//! allowed to re-derive HTTP semantics.

use reqwest::StatusCode;
use thiserror::Error;

/// A failed API request, normalized into a closed taxonomy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Transport failure: no response was received at all.
    #[error("network error: {0}")]
    Network(String),

    /// 401 — the session is invalid or expired. The pipeline has already
    /// cleared the credential and announced expiry; this is not a form
    /// error.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// 404 — the addressed resource does not exist.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// Any other 4xx — the server rejected the request; `message` is
    /// suitable to surface verbatim on the form that issued it.
    #[error("{message}")]
    Validation { status: u16, message: String },

    /// 5xx — surfaced as a generic failure.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Anything that escaped classification (odd status codes, malformed
    /// success bodies). Displayed like a server failure.
    #[error("unexpected response ({status}): {message}")]
    Unexpected { status: u16, message: String },
}

impl ApiError {
    /// The HTTP status behind this error, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Network(_) => None,
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Validation { status, .. }
            | ApiError::Server { status, .. }
            | ApiError::Unexpected { status, .. } => Some(*status),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

/// Extract a human-readable message from an error response body.
///
/// The backend wraps failures as `{"error": code, "message": text}`; plain
/// text and bare JSON string bodies are used verbatim, and an empty body
/// falls back to the status line.
pub(crate) fn message_from_body(status: StatusCode, body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        match value {
            serde_json::Value::String(s) if !s.trim().is_empty() => return s,
            value => {
                if let Some(msg) = value.get("message").and_then(|m| m.as_str()) {
                    if !msg.is_empty() {
                        return msg.to_string();
                    }
                }
                if let Some(code) = value.get("error").and_then(|m| m.as_str()) {
                    if !code.is_empty() {
                        return code.to_string();
                    }
                }
            }
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if !text.is_empty() {
        return text.to_string();
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("http status {}", status.as_u16()))
}
