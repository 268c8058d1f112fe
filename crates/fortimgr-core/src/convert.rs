// ── Raw-to-domain normalization ──
//
// Bridges raw `fortimgr_api::models` records into the output records of
// `crate::model`. This is the single place where defaults are applied:
// absent / null optional fields become `""`, `0`, or `None` as the output
// schema dictates, and only a missing required field is an error.

use std::collections::BTreeSet;

use fortimgr_api::models::{
    RawAdom, RawDevice, RawHealthCheck, RawInterface, RawSelector, RawSlaLog, RawSubnet,
    RawTunnel,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::CoreError;
use crate::model::{
    AdministrativeDomain, DeviceLookup, IpsecTunnel, ManagedDevice, NO_DATA, NetworkInterface,
    Phase2Selector, SdwanHealthCheckResult, TunnelStatus,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Coerce a controller payload into a list of records.
///
/// A single object becomes a one-element list and null becomes an empty
/// list; any other scalar is malformed.
fn records<T: DeserializeOwned>(resource: &str, payload: Value) -> Result<Vec<T>, CoreError> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        object @ Value::Object(_) => vec![object],
        other => {
            return Err(CoreError::malformed(
                resource,
                format!("expected a list or object, got {other}"),
            ));
        }
    };
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(|e| CoreError::malformed(resource, e)))
        .collect()
}

fn required(resource: &str, field: &str, value: Option<String>) -> Result<String, CoreError> {
    value.ok_or_else(|| CoreError::malformed(resource, format!("missing required field `{field}`")))
}

/// Subnet of the first entry in a selector's source / destination list.
fn first_subnet(list: Option<Vec<RawSubnet>>) -> String {
    list.and_then(|subnets| subnets.into_iter().next())
        .and_then(|subnet| subnet.subnet)
        .unwrap_or_default()
}

// ── Domains ────────────────────────────────────────────────────────

impl TryFrom<RawAdom> for AdministrativeDomain {
    type Error = CoreError;

    fn try_from(raw: RawAdom) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required("ADOM", "name", raw.name)?,
        })
    }
}

/// `/dvmdb/adom` payload → domains.
pub fn normalize_domains(payload: Value) -> Result<Vec<AdministrativeDomain>, CoreError> {
    records::<RawAdom>("ADOM", payload)?
        .into_iter()
        .map(AdministrativeDomain::try_from)
        .collect()
}

// ── Devices ────────────────────────────────────────────────────────

impl TryFrom<RawDevice> for ManagedDevice {
    type Error = CoreError;

    fn try_from(raw: RawDevice) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required("device", "name", raw.name)?,
            serial: raw.sn.unwrap_or_default(),
            platform: raw.platform_str.unwrap_or_default(),
            connection_status: raw.conn_status.unwrap_or_default(),
            domain: None,
        })
    }
}

/// `/dvmdb/adom/{adom}/device` payload → devices (no `domain`).
pub fn normalize_devices(payload: Value) -> Result<Vec<ManagedDevice>, CoreError> {
    records::<RawDevice>("device", payload)?
        .into_iter()
        .map(ManagedDevice::try_from)
        .collect()
}

/// `/dvmdb/device` filtered payload → lookup result.
///
/// The first match wins; its owning ADOM comes from `extra info.adom`.
pub fn normalize_device_lookup(name: &str, payload: Value) -> Result<DeviceLookup, CoreError> {
    let Some(raw) = records::<RawDevice>("device", payload)?.into_iter().next() else {
        return Ok(DeviceLookup::NotFound {
            name: name.to_owned(),
        });
    };
    let domain = raw.extra_info.as_ref().and_then(|info| info.adom.clone());
    let mut device = ManagedDevice::try_from(raw)?;
    device.domain = domain;
    Ok(DeviceLookup::Found(device))
}

// ── Interfaces ─────────────────────────────────────────────────────

impl TryFrom<RawInterface> for NetworkInterface {
    type Error = CoreError;

    fn try_from(raw: RawInterface) -> Result<Self, Self::Error> {
        let name = required("interface", "name", raw.name)?;
        let parts = raw.ip.as_ref().map(|ip| ip.parts()).unwrap_or_default();
        let part = |i: usize| parts.get(i).map(|s| (*s).to_owned()).unwrap_or_default();

        Ok(Self {
            ip: part(0),
            netmask: part(1),
            name,
            interface_type: raw.interface_type.unwrap_or_default(),
            status: raw.status.unwrap_or_default(),
            alias: raw.alias.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            vlan_id: raw.vlanid,
            parent_interface: raw.interface.unwrap_or_default(),
        })
    }
}

/// Stored interface config payload (list or single object) → interfaces.
pub fn normalize_interfaces(payload: Value) -> Result<Vec<NetworkInterface>, CoreError> {
    records::<RawInterface>("interface", payload)?
        .into_iter()
        .map(NetworkInterface::try_from)
        .collect()
}

// ── IPsec tunnels ──────────────────────────────────────────────────

/// Classify a tunnel from the *set* of its selector statuses.
///
/// Order and multiplicity are irrelevant: `{}` → unknown, `{up}` → up,
/// `{down}` → down, anything else → partial.
pub fn tunnel_status<'a>(statuses: impl IntoIterator<Item = &'a str>) -> TunnelStatus {
    let distinct: BTreeSet<&str> = statuses.into_iter().collect();
    let mut iter = distinct.iter();
    match (iter.next(), iter.next()) {
        (None, _) => TunnelStatus::Unknown,
        (Some(&"up"), None) => TunnelStatus::Up,
        (Some(&"down"), None) => TunnelStatus::Down,
        _ => TunnelStatus::Partial,
    }
}

impl From<RawSelector> for Phase2Selector {
    fn from(raw: RawSelector) -> Self {
        Self {
            name: raw.name.unwrap_or_default(),
            src: first_subnet(raw.proxy_src),
            dst: first_subnet(raw.proxy_dst),
            status: raw.status.unwrap_or_default(),
        }
    }
}

impl From<RawTunnel> for IpsecTunnel {
    fn from(raw: RawTunnel) -> Self {
        let phase2_selectors: Vec<Phase2Selector> = raw
            .proxyid
            .unwrap_or_default()
            .into_iter()
            .map(Phase2Selector::from)
            .collect();
        let status = tunnel_status(phase2_selectors.iter().map(|s| s.status.as_str()));

        Self {
            name: raw.name.unwrap_or_default(),
            status,
            remote_gateway: raw.rgwy.unwrap_or_default(),
            incoming_bytes: raw.incoming_bytes.unwrap_or(0),
            outgoing_bytes: raw.outgoing_bytes.unwrap_or(0),
            creation_time: raw.creation_time,
            phase2_selectors,
        }
    }
}

/// IPsec monitor results → tunnels, in controller order.
pub fn normalize_tunnels(raw: Vec<RawTunnel>) -> Vec<IpsecTunnel> {
    raw.into_iter().map(IpsecTunnel::from).collect()
}

// ── SD-WAN health checks ───────────────────────────────────────────

impl From<RawHealthCheck> for SdwanHealthCheckResult {
    fn from(raw: RawHealthCheck) -> Self {
        let latest: Option<RawSlaLog> = raw.logs.and_then(|mut logs| logs.pop());

        let (link, latency, jitter, packet_loss, timestamp) = match latest {
            Some(log) => (
                log.link.unwrap_or_else(|| NO_DATA.to_owned()),
                log.latency,
                log.jitter,
                log.packetloss,
                log.timestamp,
            ),
            None => (NO_DATA.to_owned(), None, None, None, None),
        };

        Self {
            health_check: raw.name.unwrap_or_default(),
            interface: raw.interface.unwrap_or_default(),
            link,
            latency,
            jitter,
            packet_loss,
            timestamp,
        }
    }
}

/// SLA-log monitor results → latest measurement per check.
pub fn normalize_health_checks(raw: Vec<RawHealthCheck>) -> Vec<SdwanHealthCheckResult> {
    raw.into_iter().map(SdwanHealthCheckResult::from).collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn tunnel(value: Value) -> IpsecTunnel {
        IpsecTunnel::from(serde_json::from_value::<RawTunnel>(value).unwrap())
    }

    fn health_check(value: Value) -> SdwanHealthCheckResult {
        SdwanHealthCheckResult::from(serde_json::from_value::<RawHealthCheck>(value).unwrap())
    }

    // ── Domains / devices ───────────────────────────────────────────

    #[test]
    fn domains_keep_only_name() {
        let domains = normalize_domains(json!([
            { "name": "root", "desc": "", "oid": 3 },
            { "name": "branch", "mr": 6 }
        ]))
        .unwrap();
        assert_eq!(
            domains,
            vec![
                AdministrativeDomain { name: "root".into() },
                AdministrativeDomain { name: "branch".into() },
            ]
        );
    }

    #[test]
    fn device_defaults_missing_fields() {
        let devices = normalize_devices(json!([
            { "name": "FGT-01", "sn": "FGT60F0000000001", "platform_str": "FortiGate-60F", "conn_status": "up" },
            { "name": "FGT-02" }
        ]))
        .unwrap();
        assert_eq!(devices[0].serial, "FGT60F0000000001");
        assert_eq!(devices[0].platform, "FortiGate-60F");
        assert_eq!(devices[0].connection_status, "up");
        assert_eq!(devices[1].serial, "");
        assert_eq!(devices[1].connection_status, "");
        assert!(devices.iter().all(|d| d.domain.is_none()));
    }

    #[test]
    fn device_without_name_is_malformed() {
        let err = normalize_devices(json!([{ "sn": "FGT60F0000000001" }])).unwrap_err();
        assert!(matches!(err, CoreError::MalformedData { .. }), "got: {err:?}");
    }

    #[test]
    fn lookup_takes_domain_from_extra_info() {
        let lookup = normalize_device_lookup(
            "FGT-01",
            json!([
                { "name": "FGT-01", "sn": "A", "extra info": { "adom": "branch" } },
                { "name": "FGT-01", "sn": "B", "extra info": { "adom": "other" } }
            ]),
        )
        .unwrap();
        let device = lookup.into_device().unwrap();
        assert_eq!(device.serial, "A");
        assert_eq!(device.domain.as_deref(), Some("branch"));
    }

    #[test]
    fn lookup_without_match_is_not_found() {
        assert_eq!(
            normalize_device_lookup("ghost", json!([])).unwrap(),
            DeviceLookup::NotFound { name: "ghost".into() }
        );
        assert!(!normalize_device_lookup("ghost", Value::Null).unwrap().is_found());
    }

    // ── Interfaces ──────────────────────────────────────────────────

    #[test]
    fn interface_address_from_joined_string() {
        let ifaces = normalize_interfaces(json!([{ "name": "port1", "ip": "10.0.0.1 255.255.255.0" }])).unwrap();
        assert_eq!(ifaces[0].ip, "10.0.0.1");
        assert_eq!(ifaces[0].netmask, "255.255.255.0");
    }

    #[test]
    fn interface_address_from_list() {
        let ifaces = normalize_interfaces(json!([{ "name": "port1", "ip": ["10.0.0.1", "255.255.255.0"] }])).unwrap();
        assert_eq!(ifaces[0].ip, "10.0.0.1");
        assert_eq!(ifaces[0].netmask, "255.255.255.0");
    }

    #[test]
    fn interface_empty_address_yields_empty_strings() {
        for ip in [json!([]), json!(""), Value::Null, json!(["10.0.0.1"])] {
            let ifaces = normalize_interfaces(json!([{ "name": "port1", "ip": ip.clone() }])).unwrap();
            assert_eq!(ifaces[0].netmask, "", "ip = {ip}");
            if ip != json!(["10.0.0.1"]) {
                assert_eq!(ifaces[0].ip, "", "ip = {ip}");
            }
        }
    }

    #[test]
    fn interface_fields_and_defaults() {
        let ifaces = normalize_interfaces(json!([
            {
                "name": "vlan100",
                "ip": ["192.168.100.1", "255.255.255.0"],
                "type": "vlan",
                "status": "up",
                "alias": "guests",
                "description": "Guest VLAN",
                "vlanid": 100,
                "interface": "internal"
            },
            { "name": "port2" }
        ]))
        .unwrap();

        assert_eq!(
            ifaces[0],
            NetworkInterface {
                name: "vlan100".into(),
                ip: "192.168.100.1".into(),
                netmask: "255.255.255.0".into(),
                interface_type: "vlan".into(),
                status: "up".into(),
                alias: "guests".into(),
                description: "Guest VLAN".into(),
                vlan_id: Some(100),
                parent_interface: "internal".into(),
            }
        );
        assert_eq!(
            ifaces[1],
            NetworkInterface {
                name: "port2".into(),
                ip: String::new(),
                netmask: String::new(),
                interface_type: String::new(),
                status: String::new(),
                alias: String::new(),
                description: String::new(),
                vlan_id: None,
                parent_interface: String::new(),
            }
        );
    }

    #[test]
    fn single_interface_object_is_coerced_to_list() {
        let record = json!({ "name": "port1", "ip": "10.0.0.1 255.255.255.0", "type": "physical" });
        let single = normalize_interfaces(record.clone()).unwrap();
        let listed = normalize_interfaces(json!([record])).unwrap();
        assert_eq!(single, listed);
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn interface_without_name_is_malformed() {
        let err = normalize_interfaces(json!([{ "ip": "10.0.0.1 255.255.255.0" }])).unwrap_err();
        match err {
            CoreError::MalformedData { resource, message } => {
                assert_eq!(resource, "interface");
                assert!(message.contains("name"), "{message}");
            }
            other => panic!("expected MalformedData, got: {other:?}"),
        }
    }

    #[test]
    fn interface_output_uses_contract_field_names() {
        let ifaces = normalize_interfaces(json!({ "name": "port1" })).unwrap();
        let value = serde_json::to_value(&ifaces[0]).unwrap();
        assert_eq!(value["type"], "");
        assert_eq!(value["vlan_id"], Value::Null);
        assert_eq!(value["parent_interface"], "");
    }

    // ── Tunnels ─────────────────────────────────────────────────────

    #[test]
    fn tunnel_status_is_set_based() {
        assert_eq!(tunnel_status(["up", "up"]), TunnelStatus::Up);
        assert_eq!(tunnel_status(["down", "down"]), TunnelStatus::Down);
        assert_eq!(tunnel_status(["up", "down"]), TunnelStatus::Partial);
        assert_eq!(tunnel_status(["down", "up"]), TunnelStatus::Partial);
        assert_eq!(tunnel_status(["up", "up", "up", "down"]), TunnelStatus::Partial);
        assert_eq!(tunnel_status([]), TunnelStatus::Unknown);
        assert_eq!(tunnel_status(["negotiating"]), TunnelStatus::Partial);
    }

    #[test]
    fn tunnel_with_selectors() {
        let t = tunnel(json!({
            "name": "hq-vpn",
            "rgwy": "203.0.113.10",
            "incoming_bytes": 1024,
            "outgoing_bytes": 2048,
            "creation_time": 1_700_000_000,
            "proxyid": [
                {
                    "p2name": "hq-vpn-p2a",
                    "status": "up",
                    "proxy_src": [{ "subnet": "10.1.0.0/255.255.0.0" }, { "subnet": "ignored" }],
                    "proxy_dst": [{ "subnet": "10.2.0.0/255.255.0.0" }]
                },
                {
                    "p2name": "hq-vpn-p2b",
                    "status": "down",
                    "proxy_src": [],
                    "proxy_dst": [{ "subnet": "10.3.0.0/255.255.0.0" }]
                }
            ]
        }));

        assert_eq!(t.name, "hq-vpn");
        assert_eq!(t.remote_gateway, "203.0.113.10");
        assert_eq!(t.incoming_bytes, 1024);
        assert_eq!(t.outgoing_bytes, 2048);
        assert_eq!(t.creation_time, Some(1_700_000_000));
        assert_eq!(t.status, TunnelStatus::Partial);
        assert_eq!(
            t.phase2_selectors,
            vec![
                Phase2Selector {
                    name: "hq-vpn-p2a".into(),
                    src: "10.1.0.0/255.255.0.0".into(),
                    dst: "10.2.0.0/255.255.0.0".into(),
                    status: "up".into(),
                },
                Phase2Selector {
                    name: "hq-vpn-p2b".into(),
                    src: String::new(),
                    dst: "10.3.0.0/255.255.0.0".into(),
                    status: "down".into(),
                },
            ]
        );
    }

    #[test]
    fn tunnel_defaults() {
        let t = tunnel(json!({ "name": "idle" }));
        assert_eq!(t.status, TunnelStatus::Unknown);
        assert_eq!(t.remote_gateway, "");
        assert_eq!(t.incoming_bytes, 0);
        assert_eq!(t.outgoing_bytes, 0);
        assert_eq!(t.creation_time, None);
        assert!(t.phase2_selectors.is_empty());
    }

    #[test]
    fn tunnel_status_serializes_lowercase() {
        let t = tunnel(json!({ "name": "a", "proxyid": [{ "status": "up" }] }));
        assert_eq!(serde_json::to_value(&t).unwrap()["status"], "up");
        assert_eq!(TunnelStatus::Partial.to_string(), "partial");
    }

    // ── Health checks ───────────────────────────────────────────────

    #[test]
    fn health_check_uses_last_log_entry() {
        let hc = health_check(json!({
            "name": "dns-check",
            "interface": "wan1",
            "logs": [
                { "link": "down", "latency": 10.0, "jitter": 1.0, "packetloss": 5.0, "timestamp": 100 },
                { "link": "up", "latency": 20.0, "jitter": 2.0, "packetloss": 0.0, "timestamp": 200 }
            ]
        }));
        assert_eq!(
            hc,
            SdwanHealthCheckResult {
                health_check: "dns-check".into(),
                interface: "wan1".into(),
                link: "up".into(),
                latency: Some(20.0),
                jitter: Some(2.0),
                packet_loss: Some(0.0),
                timestamp: Some(200),
            }
        );
    }

    #[test]
    fn health_check_without_logs_has_no_data() {
        for logs in [json!([]), Value::Null] {
            let hc = health_check(json!({ "name": "dns-check", "interface": "wan2", "logs": logs }));
            assert_eq!(hc.link, "no data");
            assert_eq!(hc.latency, None);
            assert_eq!(hc.jitter, None);
            assert_eq!(hc.packet_loss, None);
            assert_eq!(hc.timestamp, None);
        }
    }

    #[test]
    fn health_check_metrics_stay_null_not_zero() {
        let hc = health_check(json!({ "name": "p", "interface": "wan1", "logs": [{ "link": "up" }] }));
        assert_eq!(hc.link, "up");
        assert_eq!(hc.latency, None);
        let value = serde_json::to_value(&hc).unwrap();
        assert_eq!(value["packet_loss"], Value::Null);
    }
}
