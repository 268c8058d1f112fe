// fortimgr-api: Async Rust client for the FortiManager JSON-RPC API

pub mod auth;
pub mod error;
pub mod jsonrpc;
pub mod models;
pub mod transport;

pub use auth::{AuthStrategy, Credentials};
pub use error::Error;
pub use jsonrpc::{Connector, GetParams, JsonRpcConnector, JsonRpcSession, RpcReply, Session};
pub use transport::{TlsMode, TransportConfig};
