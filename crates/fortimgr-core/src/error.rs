// ── Core error types ──
//
// The three controller-facing failures (upstream status, device proxy
// failure, malformed data) plus the transport-class failures translated
// from `fortimgr_api::Error`. Nothing here is caught inside the core; every
// variant propagates to the operation caller.

use serde_json::Value;
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Controller errors ────────────────────────────────────────────
    /// Terminal non-zero JSON-RPC status (including `-11` once retries
    /// are exhausted). Code and payload are carried verbatim.
    #[error("FortiManager API error (status {code}): {payload}")]
    Upstream { code: i64, payload: Value },

    /// The controller call succeeded but the call it proxied to the
    /// managed device did not.
    #[error("Device proxy request to '{device}' failed: {context}")]
    DeviceProxy { device: String, context: Value },

    /// A required field is missing or the payload has the wrong shape.
    #[error("Malformed {resource} data from controller: {message}")]
    MalformedData { resource: String, message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Controller request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn malformed(resource: &str, message: impl std::fmt::Display) -> Self {
        Self::MalformedData {
            resource: resource.to_owned(),
            message: message.to_string(),
        }
    }

    /// Returns `true` if this is an upstream failure with the given status code.
    pub fn is_upstream_code(&self, expected: i64) -> bool {
        matches!(self, Self::Upstream { code, .. } if *code == expected)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<fortimgr_api::Error> for CoreError {
    fn from(err: fortimgr_api::Error) -> Self {
        match err {
            fortimgr_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            fortimgr_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                }
            }
            fortimgr_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            fortimgr_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            fortimgr_api::Error::Http { status: 401, message } => {
                CoreError::AuthenticationFailed { message }
            }
            fortimgr_api::Error::Http { status, message } => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("HTTP {status}: {message}"),
            },
            fortimgr_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            fortimgr_api::Error::EmptyResult { url } => {
                CoreError::malformed("JSON-RPC", format!("no result entries for {url}"))
            }
        }
    }
}
