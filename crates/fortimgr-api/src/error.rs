use thiserror::Error;

/// Top-level error type for the `fortimgr-api` crate.
///
/// Covers transport-level failures only. A JSON-RPC reply with a non-zero
/// status code is *not* an error at this layer -- it is returned to the
/// caller as an [`RpcReply`](crate::RpcReply) so retry policy can live above.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected, API key refused, or session token missing.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Non-2xx HTTP status from the JSON-RPC endpoint.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The JSON-RPC envelope decoded but carried no `result` entries.
    #[error("JSON-RPC response for {url} carried no result")]
    EmptyResult { url: String },
}

impl Error {
    /// Returns `true` if the controller rejected our credentials.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Authentication { .. } => true,
            Self::Http { status, .. } => *status == 401,
            _ => false,
        }
    }
}
