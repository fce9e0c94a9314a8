//! Shared helpers for command handlers.

use netwarden_core::{AnySource, StorePaths, Warden};

use crate::cli::GlobalOpts;
use crate::config::{self, Config};
use crate::error::CliError;

/// Load config and build the `Warden` for commands that need the source.
pub fn build_warden(global: &GlobalOpts) -> Result<(Config, Warden<AnySource>), CliError> {
    let cfg = config::load_config(global)?;
    let paths = config::store_paths(&cfg, global)?;
    let source = config::build_source(&cfg, global)?;
    Ok((cfg, Warden::new(source, paths)))
}

/// Load config and resolve store locations for commands that only read files.
pub fn load_paths(global: &GlobalOpts) -> Result<StorePaths, CliError> {
    let cfg = config::load_config(global)?;
    config::store_paths(&cfg, global)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
