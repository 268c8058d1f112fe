//! Command dispatch: bridges CLI args -> controller queries -> output formatting.

pub mod adoms;
pub mod config_cmd;
pub mod devices;
pub mod health;
pub mod interfaces;
pub mod tunnels;

use fortimgr_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Adoms => adoms::handle(controller, global).await,
        Command::Devices(args) => devices::handle_list(controller, args, global).await,
        Command::Find(args) => devices::handle_find(controller, args, global).await,
        Command::Interfaces(args) => interfaces::handle(controller, args, global).await,
        Command::Tunnels(args) => tunnels::handle(controller, args, global).await,
        Command::Health(args) => health::handle(controller, args, global).await,
        // Config and Completions are handled before a controller is built
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command does not use a controller connection".into(),
        )),
    }
}
