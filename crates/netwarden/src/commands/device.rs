//! Device command handlers: listing and one-shot access control.

use tabled::Tabled;

use netwarden_core::{Device, DeviceSource, DeviceStatus};

use crate::cli::{DeviceArgs, DeviceCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Signal")]
    signal: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            name: d.name.clone(),
            ip: d.ip.clone().unwrap_or_else(|| "-".into()),
            mac: d.mac.to_string(),
            kind: d.kind.clone(),
            status: d.status.to_string(),
            signal: d.signal.map_or_else(|| "-".into(), |s| format!("{s}%")),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: DeviceArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (_cfg, warden) = util::build_warden(global)?;

    match args.command {
        DeviceCommand::List => {
            let devices = warden.source().list_devices().await?;
            let out = output::render_list(&global.output, &devices, |d| DeviceRow::from(d), |d| {
                d.mac.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DeviceCommand::Allow { device } => {
            let allowed = warden.set_access(&device, DeviceStatus::Allowed).await?;
            if !global.quiet {
                eprintln!("'{}' ({}) now has internet access", allowed.name, allowed.mac);
            }
            Ok(())
        }

        DeviceCommand::Block { device } => {
            if !util::confirm(&format!("Block internet access for '{device}'?"), global.yes)? {
                return Ok(());
            }
            let blocked = warden.set_access(&device, DeviceStatus::Blocked).await?;
            if !global.quiet {
                eprintln!("'{}' ({}) is now blocked", blocked.name, blocked.mac);
            }
            Ok(())
        }
    }
}
