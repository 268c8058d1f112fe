//! ADOM command handler.

use tabled::Tabled;

use fortimgr_core::{AdministrativeDomain, Controller};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct AdomRow {
    #[tabled(rename = "Name")]
    name: String,
}

pub async fn handle(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let domains = controller.list_domains().await?;
    let out = output::render_list(
        &global.output,
        &domains,
        |d: &AdministrativeDomain| AdomRow {
            name: d.name.clone(),
        },
        |d| d.name.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
