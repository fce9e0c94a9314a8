//! Command dispatch: bridges CLI args -> core operations -> output.

pub mod allow;
pub mod config_cmd;
pub mod denylist;
pub mod device;
pub mod monitor;
pub mod snapshot;
pub mod util;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Dispatch the parsed command line to the appropriate handler.
pub async fn dispatch(cli: Cli) -> Result<(), CliError> {
    let global = &cli.global;
    match cli.command {
        Command::Snapshot(args) => snapshot::handle(args, global).await,
        Command::Monitor(args) => monitor::handle(args, global).await,
        Command::Allow { device } => allow::handle(&device, global).await,
        Command::Device(args) => device::handle(args, global).await,
        Command::Denylist(args) => denylist::handle(&args, global),
        Command::Config(args) => config_cmd::handle(&args, global),
        // Completions are handled before dispatch
        Command::Completions(_) => unreachable!(),
    }
}
