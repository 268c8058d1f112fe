// ── Device proxy reply unwrapping ──
//
// `/sys/proxy/json` forwards a request to a managed device's own REST API
// and wraps the answer in a per-target envelope. Two monitor resources
// report failure in different places:
//
// - IPsec (`/api/v2/monitor/vpn/ipsec`): controller-side `status.code` on
//   the target entry.
// - SLA log (`/api/v2/monitor/virtual-wan/sla-log`): FortiOS `status`
//   string inside `response`.
//
// They get separate parse paths so one convention is never read as the
// other.

use fortimgr_api::models::{ProxyResponse, ProxyTargetEntry};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::CoreError;

const RESOURCE: &str = "device proxy";

/// Unwrap an IPsec monitor reply addressed to one device.
///
/// A missing, non-list, or empty payload yields no records. A non-zero
/// target `status.code` is a [`CoreError::DeviceProxy`] carrying the status
/// object, whatever shape `response` has.
pub fn unwrap_tunnel_reply<T: DeserializeOwned>(
    device: &str,
    payload: Value,
) -> Result<Vec<T>, CoreError> {
    let Some(entry) = first_target(payload)? else {
        debug!(device, "empty tunnel proxy reply");
        return Ok(Vec::new());
    };

    if let Some(status) = entry.status {
        match status.code {
            Some(0) => {}
            Some(_) => {
                return Err(CoreError::DeviceProxy {
                    device: device.to_owned(),
                    context: to_context(&status),
                });
            }
            None => {
                return Err(CoreError::malformed(
                    RESOURCE,
                    format!("target status for '{device}' has no integer code"),
                ));
            }
        }
    }

    let response = decode_response(entry.response)?;
    parse_results(response.results)
}

/// Unwrap an SLA-log monitor reply addressed to one device.
///
/// A missing, non-list, or empty payload yields no records. A `response`
/// whose `status` is `"error"` is a [`CoreError::DeviceProxy`] carrying the
/// whole response object.
pub fn unwrap_health_reply<T: DeserializeOwned>(
    device: &str,
    payload: Value,
) -> Result<Vec<T>, CoreError> {
    let Some(entry) = first_target(payload)? else {
        debug!(device, "empty health-check proxy reply");
        return Ok(Vec::new());
    };

    let raw = entry.response.unwrap_or(Value::Null);
    let response = decode_response(Some(raw.clone()))?;
    if response.status.as_deref() == Some("error") {
        return Err(CoreError::DeviceProxy {
            device: device.to_owned(),
            context: raw,
        });
    }

    parse_results(response.results)
}

/// First per-target entry, or `None` for a missing / non-list / empty payload.
///
/// An entry that does not decode is malformed, never an empty entry.
fn first_target(payload: Value) -> Result<Option<ProxyTargetEntry>, CoreError> {
    let Value::Array(entries) = payload else {
        return Ok(None);
    };
    let Some(first) = entries.into_iter().next() else {
        return Ok(None);
    };
    serde_json::from_value(first)
        .map(Some)
        .map_err(|e| CoreError::malformed(RESOURCE, format!("target entry: {e}")))
}

/// The device's reply object. Absent or null means no reply body.
fn decode_response(response: Option<Value>) -> Result<ProxyResponse, CoreError> {
    match response {
        None | Some(Value::Null) => Ok(ProxyResponse::default()),
        Some(object @ Value::Object(_)) => serde_json::from_value(object)
            .map_err(|e| CoreError::malformed(RESOURCE, format!("response: {e}"))),
        Some(other) => Err(CoreError::malformed(
            RESOURCE,
            format!("expected a response object, got {other}"),
        )),
    }
}

fn parse_results<T: DeserializeOwned>(results: Option<Value>) -> Result<Vec<T>, CoreError> {
    match results {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(list @ Value::Array(_)) => {
            serde_json::from_value(list).map_err(|e| CoreError::malformed(RESOURCE, e))
        }
        Some(other) => Err(CoreError::malformed(
            RESOURCE,
            format!("expected a results list, got {other}"),
        )),
    }
}

fn to_context<S: serde::Serialize>(value: &S) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    fn tunnels(payload: Value) -> Result<Vec<Value>, CoreError> {
        unwrap_tunnel_reply("FGT-01", payload)
    }

    fn health(payload: Value) -> Result<Vec<Value>, CoreError> {
        unwrap_health_reply("FGT-01", payload)
    }

    // ── Tunnel shape ─────────────────────────────────────────────────

    #[test]
    fn tunnel_degenerate_payloads_are_empty() {
        assert!(tunnels(Value::Null).unwrap().is_empty());
        assert!(tunnels(json!({ "unexpected": true })).unwrap().is_empty());
        assert!(tunnels(json!([])).unwrap().is_empty());
    }

    #[test]
    fn tunnel_results_are_extracted() {
        let payload = json!([{
            "target": "adom/root/device/FGT-01",
            "status": { "code": 0, "message": "OK" },
            "response": { "status": "success", "results": [{ "name": "vpn-a" }, { "name": "vpn-b" }] }
        }]);
        let results = tunnels(payload).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1]["name"], "vpn-b");
    }

    #[test]
    fn tunnel_null_response_or_results_are_empty() {
        let payload = json!([{ "status": { "code": 0 }, "response": null }]);
        assert!(tunnels(payload).unwrap().is_empty());

        let payload = json!([{ "status": { "code": 0 }, "response": { "status": "success" } }]);
        assert!(tunnels(payload).unwrap().is_empty());
    }

    #[test]
    fn tunnel_target_failure_names_device_and_code() {
        let payload = json!([{
            "target": "adom/root/device/FGT-01",
            "status": { "code": -3, "message": "Device is offline" }
        }]);
        let err = tunnels(payload).unwrap_err();
        match &err {
            CoreError::DeviceProxy { device, context } => {
                assert_eq!(device, "FGT-01");
                assert_eq!(context["code"], -3);
            }
            other => panic!("expected DeviceProxy error, got: {other:?}"),
        }
        let message = err.to_string();
        assert!(message.contains("FGT-01") && message.contains("-3"), "{message}");
    }

    #[test]
    fn tunnel_failure_survives_odd_status_message() {
        let payload = json!([{ "status": { "code": -3, "message": 42 } }]);
        match tunnels(payload).unwrap_err() {
            CoreError::DeviceProxy { device, context } => {
                assert_eq!(device, "FGT-01");
                assert_eq!(context["code"], -3);
                assert_eq!(context["message"], "42");
            }
            other => panic!("expected DeviceProxy error, got: {other:?}"),
        }
    }

    #[test]
    fn tunnel_failure_survives_string_response() {
        let payload = json!([{
            "status": { "code": -3, "message": "Device is offline" },
            "response": "timeout"
        }]);
        assert!(matches!(
            tunnels(payload),
            Err(CoreError::DeviceProxy { ref device, .. }) if device == "FGT-01"
        ));
    }

    #[test]
    fn tunnel_string_response_without_failure_is_malformed() {
        let payload = json!([{ "status": { "code": 0 }, "response": "timeout" }]);
        assert!(matches!(tunnels(payload), Err(CoreError::MalformedData { .. })));
    }

    #[test]
    fn unreadable_status_code_is_malformed() {
        let payload = json!([{ "status": { "code": "offline" } }]);
        assert!(matches!(tunnels(payload), Err(CoreError::MalformedData { .. })));
    }

    #[test]
    fn undecodable_target_entry_is_malformed() {
        assert!(matches!(
            tunnels(json!(["FGT-01"])),
            Err(CoreError::MalformedData { .. })
        ));
        assert!(matches!(
            health(json!([{ "status": "error" }])),
            Err(CoreError::MalformedData { .. })
        ));
    }

    #[test]
    fn tunnel_path_ignores_response_status_string() {
        let payload = json!([{
            "status": { "code": 0 },
            "response": { "status": "error", "results": [] }
        }]);
        assert!(tunnels(payload).unwrap().is_empty());
    }

    // ── Health-check shape ───────────────────────────────────────────

    #[test]
    fn health_degenerate_payloads_are_empty() {
        assert!(health(Value::Null).unwrap().is_empty());
        assert!(health(json!("text")).unwrap().is_empty());
        assert!(health(json!([])).unwrap().is_empty());
    }

    #[test]
    fn health_error_status_carries_whole_response() {
        let payload = json!([{
            "status": { "code": 0 },
            "response": { "status": "error", "http_status": 404, "error": -5 }
        }]);
        match health(payload).unwrap_err() {
            CoreError::DeviceProxy { device, context } => {
                assert_eq!(device, "FGT-01");
                assert_eq!(context["status"], "error");
                assert_eq!(context["http_status"], 404);
            }
            other => panic!("expected DeviceProxy error, got: {other:?}"),
        }
    }

    #[test]
    fn health_error_survives_odd_member_types() {
        let payload = json!([{
            "status": { "code": 0, "message": 7 },
            "response": { "status": "error", "http_status": "404" }
        }]);
        match health(payload).unwrap_err() {
            CoreError::DeviceProxy { context, .. } => {
                assert_eq!(context, json!({ "status": "error", "http_status": "404" }));
            }
            other => panic!("expected DeviceProxy error, got: {other:?}"),
        }
    }

    #[test]
    fn health_string_response_is_malformed() {
        let payload = json!([{ "status": { "code": 0 }, "response": "timeout" }]);
        assert!(matches!(health(payload), Err(CoreError::MalformedData { .. })));
    }

    #[test]
    fn health_results_are_extracted() {
        let payload = json!([{
            "status": { "code": 0 },
            "response": { "status": "success", "results": [{ "name": "dns" }] }
        }]);
        assert_eq!(health(payload).unwrap(), vec![json!({ "name": "dns" })]);
    }

    #[test]
    fn non_list_results_are_malformed() {
        let payload = json!([{
            "status": { "code": 0 },
            "response": { "status": "success", "results": { "name": "dns" } }
        }]);
        assert!(matches!(
            health(payload),
            Err(CoreError::MalformedData { .. })
        ));
    }
}
