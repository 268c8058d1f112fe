//! Interface configuration handler.

use tabled::Tabled;

use fortimgr_core::{Controller, NetworkInterface};

use crate::cli::{DeviceArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct InterfaceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    interface_type: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Netmask")]
    netmask: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "VLAN")]
    vlan: String,
    #[tabled(rename = "Parent")]
    parent: String,
    #[tabled(rename = "Alias")]
    alias: String,
}

impl From<&NetworkInterface> for InterfaceRow {
    fn from(i: &NetworkInterface) -> Self {
        Self {
            name: i.name.clone(),
            interface_type: output::or_dash(&i.interface_type),
            ip: output::or_dash(&i.ip),
            netmask: output::or_dash(&i.netmask),
            status: output::or_dash(&i.status),
            vlan: output::opt_or_dash(i.vlan_id),
            parent: output::or_dash(&i.parent_interface),
            alias: output::or_dash(&i.alias),
        }
    }
}

pub async fn handle(
    controller: &Controller,
    args: DeviceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let interfaces = controller.list_interfaces(&args.adom, &args.device).await?;
    let out = output::render_list(
        &global.output,
        &interfaces,
        |i| InterfaceRow::from(i),
        |i| i.name.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
