// ── Interface configuration ──

use serde::{Deserialize, Serialize};

/// One interface from a device's stored configuration.
///
/// Every string field defaults to `""`; only `vlan_id` may be null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub name: String,
    pub ip: String,
    pub netmask: String,
    #[serde(rename = "type")]
    pub interface_type: String,
    pub status: String,
    pub alias: String,
    pub description: String,
    pub vlan_id: Option<i64>,
    /// Parent of a VLAN sub-interface.
    pub parent_interface: String,
}
