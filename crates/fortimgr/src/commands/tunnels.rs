//! IPsec tunnel handler.

use tabled::Tabled;

use fortimgr_core::{Controller, IpsecTunnel};

use crate::cli::{DeviceArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct TunnelRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Remote Gateway")]
    remote_gateway: String,
    #[tabled(rename = "In")]
    incoming: String,
    #[tabled(rename = "Out")]
    outgoing: String,
    #[tabled(rename = "Selectors")]
    selectors: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&IpsecTunnel> for TunnelRow {
    fn from(t: &IpsecTunnel) -> Self {
        let up = t
            .phase2_selectors
            .iter()
            .filter(|s| s.status == "up")
            .count();
        Self {
            name: t.name.clone(),
            status: t.status.to_string(),
            remote_gateway: output::or_dash(&t.remote_gateway),
            incoming: output::format_bytes(t.incoming_bytes),
            outgoing: output::format_bytes(t.outgoing_bytes),
            selectors: format!("{up}/{} up", t.phase2_selectors.len()),
            created: output::format_unix(t.creation_time),
        }
    }
}

pub async fn handle(
    controller: &Controller,
    args: DeviceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let tunnels = controller.list_tunnels(&args.adom, &args.device).await?;
    let out = output::render_list(
        &global.output,
        &tunnels,
        |t| TunnelRow::from(t),
        |t| format!("{}\t{}", t.name, t.status),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
