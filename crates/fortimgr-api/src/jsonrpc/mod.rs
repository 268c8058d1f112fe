// JSON-RPC client modules
//
// FortiManager exposes a single `POST /jsonrpc` endpoint. Every call is a
// `{ id, method, params: [{ url, ... }] }` request answered by a
// `{ id, result: [{ status: { code, message }, data }] }` envelope.

pub mod client;
pub mod models;
pub mod session;

pub use client::{Connector, JsonRpcConnector, Session};
pub use models::{GetParams, RpcReply};
pub use session::JsonRpcSession;
