// ── IPsec tunnel types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Aggregate tunnel state derived from its phase 2 selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TunnelStatus {
    /// Every selector is up.
    Up,
    /// Every selector is down.
    Down,
    /// Selectors disagree.
    Partial,
    /// No selectors reported.
    Unknown,
}

/// A phase 2 selector: one negotiated src/dst subnet pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase2Selector {
    pub name: String,
    pub src: String,
    pub dst: String,
    pub status: String,
}

/// Live state of one IPsec tunnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpsecTunnel {
    pub name: String,
    pub status: TunnelStatus,
    pub remote_gateway: String,
    pub incoming_bytes: u64,
    pub outgoing_bytes: u64,
    /// Unix timestamp (seconds).
    pub creation_time: Option<i64>,
    pub phase2_selectors: Vec<Phase2Selector>,
}
