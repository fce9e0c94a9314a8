//! Permanent whitelist (promotion) handler.

use crate::cli::GlobalOpts;
use crate::error::CliError;

use super::util;

pub async fn handle(device: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let (_cfg, warden) = util::build_warden(global)?;
    let promoted = warden.always_allow(device).await?;
    if !global.quiet {
        eprintln!(
            "'{}' ({}) is now permanently allowed",
            promoted.name, promoted.mac
        );
    }
    Ok(())
}
