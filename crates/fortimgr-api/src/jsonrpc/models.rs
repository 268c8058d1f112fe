// JSON-RPC wire envelopes
//
// Request and response shapes for FortiManager's `/jsonrpc` endpoint.
// Requests are borrowed views built per call; responses keep `data` as raw
// JSON because its shape depends entirely on the requested URL.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Request ──────────────────────────────────────────────────────────

/// Optional query parameters for a `get` call.
///
/// Serialized flat next to `url` inside the single `params` entry:
/// ```json
/// { "url": "/dvmdb/device", "filter": [["name", "==", "FGT-01"]], "option": ["extra info"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub option: Vec<String>,
}

impl GetParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter expression, e.g. `json!([["name", "==", "FGT-01"]])`.
    pub fn filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Add a request option such as `"extra info"`.
    pub fn option(mut self, option: impl Into<String>) -> Self {
        self.option.push(option.into());
        self
    }
}

/// The single element of a request's `params` array.
#[derive(Debug, Serialize)]
pub(crate) struct RpcParams<'a> {
    pub url: &'a str,
    #[serde(flatten)]
    pub query: Option<&'a GetParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<&'a Value>,
}

/// A complete JSON-RPC request body.
#[derive(Debug, Serialize)]
pub(crate) struct RpcRequest<'a> {
    pub id: u64,
    pub method: &'a str,
    pub params: [RpcParams<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<&'a str>,
    /// Ask for symbolic enum values (`"up"`) instead of integer codes.
    pub verbose: u8,
}

// ── Response ─────────────────────────────────────────────────────────

/// Top-level JSON-RPC response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct RpcResponse {
    #[serde(default)]
    #[allow(dead_code)]
    pub id: Option<u64>,
    #[serde(default)]
    pub result: Vec<RpcResult>,
    /// Present only on a successful `/sys/login/user` reply.
    #[serde(default)]
    pub session: Option<String>,
}

/// One per-URL result entry.
#[derive(Debug, Deserialize)]
pub(crate) struct RpcResult {
    #[serde(default)]
    pub status: RpcStatus,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Controller status for one result entry. `code == 0` means success.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct RpcStatus {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
}

// ── Reply ────────────────────────────────────────────────────────────

/// The `(status, payload)` pair handed back to callers.
///
/// `data` is the result's `data` member when present; otherwise the status
/// object itself, so a failed call still carries the controller's message.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcReply {
    pub code: i64,
    pub data: Value,
}

impl RpcReply {
    pub fn new(code: i64, data: Value) -> Self {
        Self { code, data }
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    pub(crate) fn from_result(result: RpcResult) -> Self {
        let code = result.status.code;
        let data = match result.data {
            Some(data) => data,
            None => serde_json::to_value(&result.status).unwrap_or(Value::Null),
        };
        Self { code, data }
    }
}
