//! Device inventory handlers: per-ADOM listing and global lookup.

use tabled::Tabled;

use fortimgr_core::{Controller, DeviceLookup, ManagedDevice};

use crate::cli::{DevicesArgs, FindArgs, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Platform")]
    platform: String,
    #[tabled(rename = "Connection")]
    connection: String,
}

impl From<&ManagedDevice> for DeviceRow {
    fn from(d: &ManagedDevice) -> Self {
        Self {
            name: d.name.clone(),
            serial: output::or_dash(&d.serial),
            platform: output::or_dash(&d.platform),
            connection: output::or_dash(&d.connection_status),
        }
    }
}

fn detail(d: &ManagedDevice) -> String {
    [
        format!("Name:        {}", d.name),
        format!("Serial:      {}", output::or_dash(&d.serial)),
        format!("Platform:    {}", output::or_dash(&d.platform)),
        format!("Connection:  {}", output::or_dash(&d.connection_status)),
        format!("ADOM:        {}", d.domain.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle_list(
    controller: &Controller,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let devices = controller.list_devices(&args.adom).await?;
    let out = output::render_list(
        &global.output,
        &devices,
        |d| DeviceRow::from(d),
        |d| d.name.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

/// `find`: a miss still prints the `{"found": false}` record for
/// structured formats, then exits with the not-found code.
pub async fn handle_find(
    controller: &Controller,
    args: FindArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let lookup = controller.find_device(&args.device).await?;

    match lookup {
        DeviceLookup::Found(ref device) => {
            let out = match global.output {
                OutputFormat::Table => detail(device),
                OutputFormat::Plain => device.domain.clone().unwrap_or_default(),
                _ => output::render_single(&global.output, &lookup, |_| String::new(), |_| {
                    String::new()
                }),
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }
        DeviceLookup::NotFound { name } => {
            if matches!(
                global.output,
                OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml
            ) {
                let out = output::render_single(
                    &global.output,
                    &DeviceLookup::NotFound { name: name.clone() },
                    |_| String::new(),
                    |_| String::new(),
                );
                output::print_output(&out, global.quiet);
            }
            Err(CliError::NotFound {
                resource_type: "device".into(),
                identifier: name,
                list_command: "devices --adom <ADOM>".into(),
            })
        }
    }
}
