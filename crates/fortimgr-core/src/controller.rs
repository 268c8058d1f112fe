// ── Controller abstraction ──
//
// Query facade over one FortiManager. Every operation is a self-contained
// read: build the wire request, run it through the retrying executor,
// unwrap proxy envelopes where needed, normalize into `crate::model`.

use std::sync::Arc;
use std::time::Duration;

use fortimgr_api::models::{RawHealthCheck, RawTunnel};
use fortimgr_api::transport::{TlsMode, TransportConfig};
use fortimgr_api::{Connector, Credentials, GetParams, JsonRpcConnector};
use serde_json::{Value, json};
use tracing::debug;

use crate::config::{AuthCredentials, ControllerConfig, TlsVerification};
use crate::convert;
use crate::error::CoreError;
use crate::executor::{RequestExecutor, RetryPolicy};
use crate::model::{
    AdministrativeDomain, DeviceLookup, IpsecTunnel, ManagedDevice, NetworkInterface,
    SdwanHealthCheckResult,
};
use crate::proxy;

const PROXY_URL: &str = "/sys/proxy/json";
const IPSEC_MONITOR: &str = "/api/v2/monitor/vpn/ipsec";
const SLA_LOG_MONITOR: &str = "/api/v2/monitor/virtual-wan/sla-log";

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Holds no session state:
/// each request attempt opens and closes its own session through the
/// connector.
pub struct Controller<C = JsonRpcConnector> {
    inner: Arc<ControllerInner<C>>,
}

struct ControllerInner<C> {
    executor: RequestExecutor<C>,
    /// Per-request HTTP limit, when the transport was built here.
    request_timeout: Option<Duration>,
}

impl<C> Clone for Controller<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Controller<JsonRpcConnector> {
    /// Build a controller that talks JSON-RPC over HTTPS.
    ///
    /// Does not contact the controller; the first request does.
    pub fn new(config: &ControllerConfig) -> Result<Self, CoreError> {
        let transport = build_transport(config);
        let connector =
            JsonRpcConnector::new(&config.url, credentials(&config.auth), &transport)?;
        debug!(url = %config.url, retries = config.retry.max_retries, "controller configured");
        Ok(Self::build(connector, config.retry, Some(config.timeout)))
    }
}

impl<C: Connector> Controller<C> {
    /// Build a controller over any connector (used for tests and
    /// alternative transports).
    pub fn with_connector(connector: C, retry: RetryPolicy) -> Self {
        Self::build(connector, retry, None)
    }

    fn build(connector: C, retry: RetryPolicy, request_timeout: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                executor: RequestExecutor::new(connector, retry),
                request_timeout,
            }),
        }
    }

    /// The retry policy applied to every request.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.inner.executor.policy()
    }

    // ── Inventory ────────────────────────────────────────────────

    /// List all administrative domains.
    pub async fn list_domains(&self) -> Result<Vec<AdministrativeDomain>, CoreError> {
        let payload = self.get("/dvmdb/adom", &GetParams::new()).await?;
        convert::normalize_domains(payload)
    }

    /// List the devices managed in one domain.
    pub async fn list_devices(&self, domain: &str) -> Result<Vec<ManagedDevice>, CoreError> {
        let url = format!("/dvmdb/adom/{domain}/device");
        let payload = self.get(&url, &GetParams::new()).await?;
        convert::normalize_devices(payload)
    }

    /// Look a device up by name across every domain.
    ///
    /// No match is [`DeviceLookup::NotFound`], not an error.
    pub async fn find_device(&self, name: &str) -> Result<DeviceLookup, CoreError> {
        let params = GetParams::new()
            .filter(json!([["name", "==", name]]))
            .option("extra info");
        let payload = self.get("/dvmdb/device", &params).await?;
        convert::normalize_device_lookup(name, payload)
    }

    // ── Device state ─────────────────────────────────────────────

    /// Stored interface configuration of one device.
    ///
    /// The configuration database is keyed by device only; `domain` is
    /// accepted for symmetry with the live queries.
    pub async fn list_interfaces(
        &self,
        domain: &str,
        device: &str,
    ) -> Result<Vec<NetworkInterface>, CoreError> {
        debug!(domain, device, "listing interfaces");
        let url = format!("/pm/config/device/{device}/global/system/interface");
        let payload = self.get(&url, &GetParams::new()).await?;
        convert::normalize_interfaces(payload)
    }

    /// Live IPsec tunnel state, proxied to the device.
    pub async fn list_tunnels(
        &self,
        domain: &str,
        device: &str,
    ) -> Result<Vec<IpsecTunnel>, CoreError> {
        let payload = self.proxy(domain, device, IPSEC_MONITOR).await?;
        let raw: Vec<RawTunnel> = proxy::unwrap_tunnel_reply(device, payload)?;
        Ok(convert::normalize_tunnels(raw))
    }

    /// Live SD-WAN health-check state, proxied to the device.
    pub async fn list_health_checks(
        &self,
        domain: &str,
        device: &str,
    ) -> Result<Vec<SdwanHealthCheckResult>, CoreError> {
        let payload = self.proxy(domain, device, SLA_LOG_MONITOR).await?;
        let raw: Vec<RawHealthCheck> = proxy::unwrap_health_reply(device, payload)?;
        Ok(convert::normalize_health_checks(raw))
    }

    // ── Request helpers ──────────────────────────────────────────

    async fn get(&self, url: &str, params: &GetParams) -> Result<Value, CoreError> {
        self.inner
            .executor
            .get(url, params)
            .await
            .map_err(|e| self.with_timeout(e))
    }

    async fn proxy(&self, domain: &str, device: &str, resource: &str) -> Result<Value, CoreError> {
        let body = proxy_request(domain, device, resource);
        debug!(domain, device, resource, "proxying monitor request");
        self.inner
            .executor
            .execute(PROXY_URL, &body)
            .await
            .map_err(|e| self.with_timeout(e))
    }

    /// The transport reports a timeout without its limit; fill it in.
    fn with_timeout(&self, err: CoreError) -> CoreError {
        match (err, self.inner.request_timeout) {
            (CoreError::Timeout { timeout_secs: 0 }, Some(limit)) => CoreError::Timeout {
                timeout_secs: limit.as_secs(),
            },
            (err, _) => err,
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────

/// `/sys/proxy/json` body for a single-device monitor `get`.
fn proxy_request(domain: &str, device: &str, resource: &str) -> Value {
    json!({
        "action": "get",
        "resource": resource,
        "target": [format!("adom/{domain}/device/{device}")],
    })
}

fn credentials(auth: &AuthCredentials) -> Credentials {
    match auth {
        AuthCredentials::ApiKey(key) => Credentials::ApiKey { key: key.clone() },
        AuthCredentials::Credentials { username, password } => Credentials::Password {
            username: username.clone(),
            password: password.clone(),
        },
    }
}

/// Build a [`TransportConfig`] from the controller configuration.
fn build_transport(config: &ControllerConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
