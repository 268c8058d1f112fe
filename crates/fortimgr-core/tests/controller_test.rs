#![allow(clippy::unwrap_used)]
// End-to-end tests for `Controller` over an in-memory connector: wire
// paths and bodies go out, canned controller replies come back.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use fortimgr_api::{Connector, Error, GetParams, RpcReply, Session};
use fortimgr_core::{Controller, CoreError, DeviceLookup, RetryPolicy, TunnelStatus};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

// ── Mock connector ──────────────────────────────────────────────────

/// One recorded request: method, url, and either the get params or the exec body.
#[derive(Debug, Clone)]
struct Recorded {
    method: &'static str,
    url: String,
    body: Value,
}

#[derive(Default)]
struct MockState {
    replies: Mutex<HashMap<String, Vec<RpcReply>>>,
    requests: Mutex<Vec<Recorded>>,
}

/// Replies are keyed by url; several replies for one url are served in order.
#[derive(Clone, Default)]
struct MockConnector(Arc<MockState>);

struct MockSession(Arc<MockState>);

impl MockConnector {
    fn reply(self, url: &str, code: i64, data: Value) -> Self {
        self.0
            .replies
            .lock()
            .unwrap()
            .entry(url.to_owned())
            .or_default()
            .push(RpcReply::new(code, data));
        self
    }

    fn requests(&self) -> Vec<Recorded> {
        self.0.requests.lock().unwrap().clone()
    }
}

impl MockSession {
    fn answer(&self, method: &'static str, url: &str, body: Value) -> Result<RpcReply, Error> {
        self.0.requests.lock().unwrap().push(Recorded {
            method,
            url: url.to_owned(),
            body,
        });
        let mut replies = self.0.replies.lock().unwrap();
        let queue = replies.get_mut(url).ok_or_else(|| Error::EmptyResult { url: url.to_owned() })?;
        if queue.len() > 1 {
            Ok(queue.remove(0))
        } else {
            queue.first().cloned().ok_or_else(|| Error::EmptyResult { url: url.to_owned() })
        }
    }
}

impl Connector for MockConnector {
    type Session = MockSession;

    async fn open(&self) -> Result<MockSession, Error> {
        Ok(MockSession(Arc::clone(&self.0)))
    }
}

impl Session for MockSession {
    async fn get(&self, url: &str, params: &GetParams) -> Result<RpcReply, Error> {
        self.answer("get", url, serde_json::to_value(params).unwrap())
    }

    async fn execute(&self, url: &str, data: &Value) -> Result<RpcReply, Error> {
        self.answer("exec", url, data.clone())
    }

    async fn close(self) {}
}

fn controller(connector: &MockConnector) -> Controller<MockConnector> {
    Controller::with_connector(connector.clone(), RetryPolicy::new(3, Duration::from_secs(5)))
}

fn proxy_ok(results: Value) -> Value {
    json!([{
        "target": "adom/root/device/FGT-01",
        "status": { "code": 0, "message": "OK" },
        "response": { "http_status": 200, "status": "success", "results": results }
    }])
}

// ── Inventory ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_domains() {
    let connector = MockConnector::default().reply(
        "/dvmdb/adom",
        0,
        json!([{ "name": "root", "oid": 3 }, { "name": "branch", "desc": "Branch offices" }]),
    );

    let domains = controller(&connector).list_domains().await.unwrap();

    let names: Vec<_> = domains.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["root", "branch"]);
    assert_eq!(connector.requests()[0].method, "get");
}

#[tokio::test]
async fn test_list_devices_uses_domain_path() {
    let connector = MockConnector::default().reply(
        "/dvmdb/adom/branch/device",
        0,
        json!([{ "name": "FGT-01", "sn": "FGT60F0000000001", "platform_str": "FortiGate-60F", "conn_status": 1 }]),
    );

    let devices = controller(&connector).list_devices("branch").await.unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].name, "FGT-01");
    assert_eq!(devices[0].connection_status, "1");
    assert_eq!(devices[0].domain, None);
    assert_eq!(connector.requests()[0].url, "/dvmdb/adom/branch/device");
}

#[tokio::test]
async fn test_list_devices_unknown_domain_is_upstream_error() {
    let connector = MockConnector::default().reply(
        "/dvmdb/adom/nope/device",
        -6,
        json!({ "code": -6, "message": "Invalid url" }),
    );

    let err = controller(&connector).list_devices("nope").await.unwrap_err();

    assert!(err.is_upstream_code(-6), "got: {err:?}");
}

#[tokio::test]
async fn test_find_device_sends_filter_and_extra_info() {
    let connector = MockConnector::default().reply(
        "/dvmdb/device",
        0,
        json!([{ "name": "FGT-01", "sn": "FGT60F0000000001", "extra info": { "adom": "branch" } }]),
    );

    let lookup = controller(&connector).find_device("FGT-01").await.unwrap();

    let request = &connector.requests()[0];
    assert_eq!(request.url, "/dvmdb/device");
    assert_eq!(request.body["filter"], json!([["name", "==", "FGT-01"]]));
    assert_eq!(request.body["option"], json!(["extra info"]));

    let device = lookup.into_device().unwrap();
    assert_eq!(device.domain.as_deref(), Some("branch"));
    assert_eq!(
        serde_json::to_value(&device).unwrap()["domain"],
        json!("branch")
    );
}

#[tokio::test]
async fn test_find_device_not_found() {
    let connector = MockConnector::default().reply("/dvmdb/device", 0, json!([]));

    let lookup = controller(&connector).find_device("ghost").await.unwrap();

    assert_eq!(lookup, DeviceLookup::NotFound { name: "ghost".into() });
    assert_eq!(
        serde_json::to_value(&lookup).unwrap(),
        json!({ "found": false, "name": "ghost" })
    );
}

// ── Device state ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_interfaces_single_object_payload() {
    let connector = MockConnector::default().reply(
        "/pm/config/device/FGT-01/global/system/interface",
        0,
        json!({ "name": "port1", "ip": ["10.0.0.1", "255.255.255.0"], "type": "physical", "status": "up" }),
    );

    let ifaces = controller(&connector).list_interfaces("root", "FGT-01").await.unwrap();

    assert_eq!(ifaces.len(), 1);
    assert_eq!(ifaces[0].ip, "10.0.0.1");
    assert_eq!(ifaces[0].netmask, "255.255.255.0");
    assert_eq!(ifaces[0].interface_type, "physical");
}

#[tokio::test]
async fn test_list_interfaces_missing_name_is_malformed() {
    let connector = MockConnector::default().reply(
        "/pm/config/device/FGT-01/global/system/interface",
        0,
        json!([{ "ip": "10.0.0.1 255.255.255.0" }]),
    );

    let err = controller(&connector).list_interfaces("root", "FGT-01").await.unwrap_err();

    assert!(matches!(err, CoreError::MalformedData { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_list_tunnels_proxies_ipsec_monitor() {
    let connector = MockConnector::default().reply(
        "/sys/proxy/json",
        0,
        proxy_ok(json!([{
            "name": "hq-vpn",
            "rgwy": "203.0.113.10",
            "incoming_bytes": 10,
            "outgoing_bytes": 20,
            "proxyid": [
                { "p2name": "a", "status": "up", "proxy_src": [{ "subnet": "10.1.0.0/16" }], "proxy_dst": [{ "subnet": "10.2.0.0/16" }] },
                { "p2name": "b", "status": "up" }
            ]
        }])),
    );

    let tunnels = controller(&connector).list_tunnels("root", "FGT-01").await.unwrap();

    let request = &connector.requests()[0];
    assert_eq!(request.method, "exec");
    assert_eq!(
        request.body,
        json!({
            "action": "get",
            "resource": "/api/v2/monitor/vpn/ipsec",
            "target": ["adom/root/device/FGT-01"],
        })
    );
    assert_eq!(tunnels.len(), 1);
    assert_eq!(tunnels[0].status, TunnelStatus::Up);
    assert_eq!(tunnels[0].phase2_selectors[0].src, "10.1.0.0/16");
    assert_eq!(tunnels[0].phase2_selectors[1].dst, "");
}

#[tokio::test]
async fn test_list_tunnels_device_failure() {
    let connector = MockConnector::default().reply(
        "/sys/proxy/json",
        0,
        json!([{ "target": "adom/root/device/FGT-01", "status": { "code": -3, "message": "Device not reachable" } }]),
    );

    let err = controller(&connector).list_tunnels("root", "FGT-01").await.unwrap_err();

    match err {
        CoreError::DeviceProxy { device, context } => {
            assert_eq!(device, "FGT-01");
            assert_eq!(context["code"], -3);
        }
        other => panic!("expected DeviceProxy error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_list_tunnels_empty_payload() {
    let connector = MockConnector::default().reply("/sys/proxy/json", 0, json!([]));

    let tunnels = controller(&connector).list_tunnels("root", "FGT-01").await.unwrap();

    assert!(tunnels.is_empty());
}

#[tokio::test]
async fn test_list_health_checks_proxies_sla_log() {
    let connector = MockConnector::default().reply(
        "/sys/proxy/json",
        0,
        proxy_ok(json!([
            {
                "name": "dns-check",
                "interface": "wan1",
                "logs": [
                    { "link": "up", "latency": 12.5, "jitter": 0.4, "packetloss": 0, "timestamp": 1_700_000_000 },
                    { "link": "up", "latency": 13.0, "jitter": 0.5, "packetloss": 1, "timestamp": 1_700_000_010 }
                ]
            },
            { "name": "dns-check", "interface": "wan2", "logs": [] }
        ])),
    );

    let checks = controller(&connector).list_health_checks("root", "FGT-01").await.unwrap();

    assert_eq!(
        connector.requests()[0].body["resource"],
        "/api/v2/monitor/virtual-wan/sla-log"
    );
    assert_eq!(checks.len(), 2);
    assert_eq!(checks[0].latency, Some(13.0));
    assert_eq!(checks[0].packet_loss, Some(1.0));
    assert_eq!(checks[0].timestamp, Some(1_700_000_010));
    assert_eq!(checks[1].link, "no data");
    assert_eq!(checks[1].latency, None);
}

#[tokio::test]
async fn test_list_health_checks_error_response() {
    let connector = MockConnector::default().reply(
        "/sys/proxy/json",
        0,
        json!([{
            "status": { "code": 0, "message": "OK" },
            "response": { "status": "error", "http_status": 424 }
        }]),
    );

    let err = controller(&connector).list_health_checks("root", "FGT-01").await.unwrap_err();

    assert!(matches!(err, CoreError::DeviceProxy { .. }), "got: {err:?}");
}

// ── Retry ───────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_transient_denial_is_retried_through_controller() {
    let connector = MockConnector::default()
        .reply("/dvmdb/adom", -11, json!({ "code": -11, "message": "No permission for the resource" }))
        .reply("/dvmdb/adom", 0, json!([{ "name": "root" }]));
    let start = tokio::time::Instant::now();

    let domains = controller(&connector).list_domains().await.unwrap();

    assert_eq!(domains.len(), 1);
    assert_eq!(connector.requests().len(), 2);
    assert_eq!(start.elapsed(), Duration::from_secs(5));
}

#[tokio::test]
async fn test_controller_is_cloneable_and_shares_connector() {
    let connector = MockConnector::default().reply("/dvmdb/adom", 0, json!([]));
    let a = controller(&connector);
    let b = a.clone();

    a.list_domains().await.unwrap();
    b.list_domains().await.unwrap();

    assert_eq!(connector.requests().len(), 2);
}
