// JSON-RPC session
//
// A session is one request/response conversation bound to an optional
// login token. Password sessions log in via `exec /sys/login/user` and
// release the token via `exec /sys/logout`; API-key sessions carry their
// bearer header on the shared HTTP client and need neither.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::{debug, trace, warn};
use url::Url;

use super::client::Session;
use super::models::{GetParams, RpcParams, RpcReply, RpcRequest, RpcResponse};
use crate::error::Error;

const LOGIN_URL: &str = "/sys/login/user";
const LOGOUT_URL: &str = "/sys/logout";

/// A single FortiManager JSON-RPC session.
#[derive(Debug)]
pub struct JsonRpcSession {
    http: reqwest::Client,
    endpoint: Url,
    next_id: Arc<AtomicU64>,
    token: Option<String>,
}

impl JsonRpcSession {
    pub(crate) fn new(http: reqwest::Client, endpoint: Url, next_id: Arc<AtomicU64>) -> Self {
        Self {
            http,
            endpoint,
            next_id,
            token: None,
        }
    }

    /// Whether this session holds a login token.
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Exchange username/password for a session token.
    pub(crate) async fn login(
        mut self,
        username: &str,
        password: &SecretString,
    ) -> Result<Self, Error> {
        debug!(username, "logging in");
        let data = json!({
            "user": username,
            "passwd": password.expose_secret(),
        });
        let (reply, token) = self.call("exec", LOGIN_URL, None, Some(&data)).await?;

        if !reply.is_success() {
            return Err(Error::Authentication {
                message: format!("login rejected (status {}): {}", reply.code, reply.data),
            });
        }
        let token = token.ok_or_else(|| Error::Authentication {
            message: "login succeeded but no session token was returned".into(),
        })?;

        debug!("login successful");
        self.token = Some(token);
        Ok(self)
    }

    /// Issue one JSON-RPC call and reduce the envelope to its first result.
    ///
    /// Returns the reply plus the top-level `session` member (login only).
    async fn call(
        &self,
        method: &str,
        url: &str,
        query: Option<&GetParams>,
        data: Option<&Value>,
    ) -> Result<(RpcReply, Option<String>), Error> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            id,
            method,
            params: [RpcParams { url, query, data }],
            session: self.token.as_deref(),
            verbose: 1,
        };
        debug!(id, method, url, "JSON-RPC request");

        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "controller rejected credentials (HTTP 401)".into(),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(id, bytes = body.len(), "JSON-RPC response");

        let envelope: RpcResponse = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;

        let RpcResponse {
            result, session, ..
        } = envelope;
        let first = result.into_iter().next().ok_or_else(|| Error::EmptyResult {
            url: url.to_owned(),
        })?;
        if let Some(ref echoed) = first.url {
            trace!(id, url = echoed.as_str(), code = first.status.code, "JSON-RPC result");
        }

        Ok((RpcReply::from_result(first), session))
    }
}

impl Session for JsonRpcSession {
    async fn get(&self, url: &str, params: &GetParams) -> Result<RpcReply, Error> {
        let (reply, _) = self.call("get", url, Some(params), None).await?;
        Ok(reply)
    }

    async fn execute(&self, url: &str, data: &Value) -> Result<RpcReply, Error> {
        let (reply, _) = self.call("exec", url, None, Some(data)).await?;
        Ok(reply)
    }

    async fn close(self) {
        if self.token.is_none() {
            return;
        }
        match self.call("exec", LOGOUT_URL, None, None).await {
            Ok((reply, _)) if reply.is_success() => debug!("logout complete"),
            Ok((reply, _)) => warn!(code = reply.code, "logout returned non-zero status"),
            Err(e) => warn!(error = %e, "logout failed"),
        }
    }
}
