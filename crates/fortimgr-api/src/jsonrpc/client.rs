// JSON-RPC connector
//
// Owns the shared `reqwest::Client` and credentials. Each call to
// `open()` produces an independent `JsonRpcSession`; nothing about a
// session outlives its `close()`. The `Connector` / `Session` traits are the
// seam `fortimgr-core` programs against, so tests can swap in a scripted
// controller without HTTP.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::models::{GetParams, RpcReply};
use super::session::JsonRpcSession;
use crate::auth::Credentials;
use crate::error::Error;
use crate::transport::TransportConfig;

// ── Seam traits ──────────────────────────────────────────────────────

/// One authenticated conversation with the controller.
///
/// Both call shapes return the controller's `(status, payload)` pair; a
/// non-zero status is a normal reply, not an `Err`.
pub trait Session: Send + Sync {
    /// `get` a resource URL with an optional filter and options.
    fn get(
        &self,
        url: &str,
        params: &GetParams,
    ) -> impl Future<Output = Result<RpcReply, Error>> + Send;

    /// `exec` a resource URL with a JSON `data` body.
    fn execute(
        &self,
        url: &str,
        data: &Value,
    ) -> impl Future<Output = Result<RpcReply, Error>> + Send;

    /// Release the session. Never fails; release problems are logged.
    fn close(self) -> impl Future<Output = ()> + Send;
}

/// Factory for sessions.
pub trait Connector: Send + Sync {
    type Session: Session;

    /// Acquire a fresh session (logging in if the credentials require it).
    fn open(&self) -> impl Future<Output = Result<Self::Session, Error>> + Send;
}

// ── Connector ────────────────────────────────────────────────────────

/// HTTP connector for a FortiManager's `/jsonrpc` endpoint.
#[derive(Debug, Clone)]
pub struct JsonRpcConnector {
    http: reqwest::Client,
    endpoint: Url,
    credentials: Credentials,
    next_id: Arc<AtomicU64>,
}

impl JsonRpcConnector {
    /// Build from a controller base URL, credentials, and transport config.
    ///
    /// With [`Credentials::ApiKey`] the key is installed as a sensitive
    /// `Authorization: Bearer` default header; password credentials are
    /// exchanged for a session token on every [`open()`](Connector::open).
    pub fn new(
        base_url: &Url,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        if let Credentials::ApiKey { key } = &credentials {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", key.expose_secret()))
                .map_err(|e| Error::Authentication {
                    message: format!("invalid API key header value: {e}"),
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = transport.build_client_with_headers(headers)?;
        Self::with_client(http, base_url, credentials)
    }

    /// Wrap an existing `reqwest::Client` (caller manages default headers).
    pub fn with_client(
        http: reqwest::Client,
        base_url: &Url,
        credentials: Credentials,
    ) -> Result<Self, Error> {
        let endpoint = Self::endpoint_url(base_url)?;
        debug!(%endpoint, strategy = ?credentials.strategy(), "configured JSON-RPC connector");
        Ok(Self {
            http,
            endpoint,
            credentials,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// The resolved `/jsonrpc` endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// `https://host` and `https://host/jsonrpc` both resolve to `https://host/jsonrpc`.
    fn endpoint_url(base_url: &Url) -> Result<Url, Error> {
        let path = base_url.path().trim_end_matches('/');
        if path.ends_with("/jsonrpc") {
            return Ok(base_url.clone());
        }
        let mut url = base_url.clone();
        url.set_path(&format!("{path}/jsonrpc"));
        Ok(url)
    }
}

impl Connector for JsonRpcConnector {
    type Session = JsonRpcSession;

    async fn open(&self) -> Result<JsonRpcSession, Error> {
        let session = JsonRpcSession::new(
            self.http.clone(),
            self.endpoint.clone(),
            Arc::clone(&self.next_id),
        );
        match &self.credentials {
            Credentials::ApiKey { .. } => Ok(session),
            Credentials::Password { username, password } => {
                session.login(username, password).await
            }
        }
    }
}
