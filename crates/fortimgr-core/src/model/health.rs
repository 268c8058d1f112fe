// ── SD-WAN health check types ──

use serde::{Deserialize, Serialize};

/// `link` value for a health check with no log entries.
pub const NO_DATA: &str = "no data";

/// Latest measurement of one SD-WAN health check on one member interface.
///
/// Metrics are null -- never zero -- when the check has no measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdwanHealthCheckResult {
    pub health_check: String,
    pub interface: String,
    pub link: String,
    pub latency: Option<f64>,
    pub jitter: Option<f64>,
    pub packet_loss: Option<f64>,
    /// Unix timestamp (seconds) of the measurement.
    pub timestamp: Option<i64>,
}
