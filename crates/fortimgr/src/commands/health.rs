//! SD-WAN health-check handler.

use tabled::Tabled;

use fortimgr_core::{Controller, SdwanHealthCheckResult};

use crate::cli::{DeviceArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct HealthRow {
    #[tabled(rename = "Health Check")]
    health_check: String,
    #[tabled(rename = "Interface")]
    interface: String,
    #[tabled(rename = "Link")]
    link: String,
    #[tabled(rename = "Latency (ms)")]
    latency: String,
    #[tabled(rename = "Jitter (ms)")]
    jitter: String,
    #[tabled(rename = "Loss (%)")]
    packet_loss: String,
    #[tabled(rename = "Measured")]
    measured: String,
}

fn metric(value: Option<f64>) -> String {
    output::opt_or_dash(value.map(|v| format!("{v:.2}")))
}

impl From<&SdwanHealthCheckResult> for HealthRow {
    fn from(h: &SdwanHealthCheckResult) -> Self {
        Self {
            health_check: h.health_check.clone(),
            interface: output::or_dash(&h.interface),
            link: h.link.clone(),
            latency: metric(h.latency),
            jitter: metric(h.jitter),
            packet_loss: metric(h.packet_loss),
            measured: output::format_unix(h.timestamp),
        }
    }
}

pub async fn handle(
    controller: &Controller,
    args: DeviceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let checks = controller
        .list_health_checks(&args.adom, &args.device)
        .await?;
    let out = output::render_list(
        &global.output,
        &checks,
        |h| HealthRow::from(h),
        |h| format!("{}\t{}\t{}", h.health_check, h.interface, h.link),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
