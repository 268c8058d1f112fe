// Raw controller response types
//
// Structural models for the payloads behind each resource URL. FortiOS and
// FortiManager are inconsistent about field presence and types across
// firmware releases (enums arrive as strings or integers, references as
// strings or single-element lists), so every field is optional and the
// enum-ish ones go through the lenient deserializers below. Defaults are
// applied by the normalizers in `fortimgr-core`, not here.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ── Lenient scalar deserializers ─────────────────────────────────────

pub mod lenient {
    //! `deserialize_with` helpers that accept any JSON scalar shape the
    //! controller has been seen to emit and never fail on type mismatch.

    use super::{Deserialize, Deserializer, Value};

    fn value_to_string(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Array(items) => {
                let parts: Vec<String> = items.iter().filter_map(value_to_string).collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join(", "))
                }
            }
            Value::Null | Value::Object(_) => None,
        }
    }

    /// String, number, bool, or list of those (joined with `", "`).
    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(value.as_ref().and_then(value_to_string))
    }

    /// Integer or numeric string.
    pub fn i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(match value {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().and_then(|f| format!("{f:.0}").parse().ok())),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// Non-negative integer or numeric string.
    pub fn u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(match value {
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| n.as_f64().and_then(|f| format!("{f:.0}").parse().ok())),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// Float, integer, or numeric string.
    pub fn f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(match value {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        })
    }
}

// ── Device manager database (dvmdb) ──────────────────────────────────

/// Administrative domain from `/dvmdb/adom`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAdom {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub desc: Option<String>,
    /// Catch-all for the remaining ADOM attributes.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Managed device from `/dvmdb/adom/{adom}/device` or `/dvmdb/device`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDevice {
    #[serde(default)]
    pub name: Option<String>,
    /// Serial number.
    #[serde(default, deserialize_with = "lenient::string")]
    pub sn: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub platform_str: Option<String>,
    /// `"up"` / `"down"` with `verbose: 1`, `1` / `2` without.
    #[serde(default, deserialize_with = "lenient::string")]
    pub conn_status: Option<String>,
    /// Populated only when the request carried `option: ["extra info"]`.
    #[serde(default, rename = "extra info")]
    pub extra_info: Option<DeviceExtraInfo>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// The `extra info` block of a device record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceExtraInfo {
    #[serde(default)]
    pub adom: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Stored device configuration (pm/config) ──────────────────────────

/// Combined address field of an interface.
///
/// FortiManager returns `["10.0.0.1", "255.255.255.0"]`; some firmware and
/// imported configs carry `"10.0.0.1 255.255.255.0"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AddressField {
    Parts(Vec<String>),
    Joined(String),
    /// Anything else (numbers, objects, mixed lists) carries no address.
    Other(Value),
}

impl AddressField {
    /// Split into ordered parts. Empty strings yield zero parts.
    pub fn parts(&self) -> Vec<&str> {
        match self {
            Self::Parts(parts) => parts.iter().map(String::as_str).collect(),
            Self::Joined(joined) => joined.split_whitespace().collect(),
            Self::Other(_) => Vec::new(),
        }
    }
}

/// Interface record from `/pm/config/device/{device}/global/system/interface`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawInterface {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ip: Option<AddressField>,
    #[serde(default, rename = "type", deserialize_with = "lenient::string")]
    pub interface_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub alias: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub vlanid: Option<i64>,
    /// Parent interface for VLAN sub-interfaces.
    #[serde(default, deserialize_with = "lenient::string")]
    pub interface: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Device proxy (/sys/proxy/json) ───────────────────────────────────

/// Per-target entry of a `/sys/proxy/json` reply.
///
/// ```json
/// [{ "target": "adom/root/device/FGT-01",
///    "status": { "code": 0, "message": "OK" },
///    "response": { "status": "success", "results": [ ... ] } }]
/// ```
///
/// `response` stays raw: a device that failed may answer with a bare
/// string instead of an object, and that must not hide the target status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyTargetEntry {
    #[serde(default, deserialize_with = "lenient::string")]
    pub target: Option<String>,
    #[serde(default)]
    pub status: Option<ProxyTargetStatus>,
    #[serde(default)]
    pub response: Option<Value>,
}

/// Controller-side status of the proxied call to one target.
///
/// `code` is `None` when the controller sent something that is not an
/// integer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyTargetStatus {
    #[serde(default, deserialize_with = "lenient::i64")]
    pub code: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// The managed device's own REST API reply, carried inside the entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyResponse {
    /// FortiOS reply status (`"success"` / `"error"`).
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: Option<String>,
    #[serde(default)]
    pub results: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── FortiOS monitor: IPsec ───────────────────────────────────────────

/// Tunnel from `/api/v2/monitor/vpn/ipsec`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTunnel {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    /// Remote gateway address.
    #[serde(default, deserialize_with = "lenient::string")]
    pub rgwy: Option<String>,
    #[serde(default, deserialize_with = "lenient::u64")]
    pub incoming_bytes: Option<u64>,
    #[serde(default, deserialize_with = "lenient::u64")]
    pub outgoing_bytes: Option<u64>,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub creation_time: Option<i64>,
    /// Phase 2 selectors.
    #[serde(default)]
    pub proxyid: Option<Vec<RawSelector>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Phase 2 selector nested in a tunnel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSelector {
    #[serde(default, rename = "p2name", deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: Option<String>,
    #[serde(default)]
    pub proxy_src: Option<Vec<RawSubnet>>,
    #[serde(default)]
    pub proxy_dst: Option<Vec<RawSubnet>>,
}

/// One subnet entry of a selector's source / destination list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSubnet {
    #[serde(default, deserialize_with = "lenient::string")]
    pub subnet: Option<String>,
}

// ── FortiOS monitor: SD-WAN SLA log ──────────────────────────────────

/// Health check from `/api/v2/monitor/virtual-wan/sla-log`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHealthCheck {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub interface: Option<String>,
    /// Oldest first; the last entry is the latest sample.
    #[serde(default)]
    pub logs: Option<Vec<RawSlaLog>>,
}

/// One SLA measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSlaLog {
    #[serde(default, deserialize_with = "lenient::string")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub latency: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub jitter: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub packetloss: Option<f64>,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub timestamp: Option<i64>,
}
