//! Snapshot command handlers.

use tabled::Tabled;

use netwarden_core::{SnapshotEntry, SnapshotStore};

use crate::cli::{GlobalOpts, SnapshotArgs, SnapshotCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SnapshotRow {
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&(String, SnapshotEntry)> for SnapshotRow {
    fn from((ip, entry): &(String, SnapshotEntry)) -> Self {
        Self {
            ip: ip.clone(),
            name: entry.name.clone(),
            kind: entry.kind.clone(),
            status: entry.status.to_string(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: SnapshotArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        SnapshotCommand::Create => {
            let (_cfg, warden) = util::build_warden(global)?;
            let path = warden.paths().snapshot.clone();
            if path.exists()
                && !util::confirm(
                    &format!("Overwrite the existing snapshot at {}?", path.display()),
                    global.yes,
                )?
            {
                return Ok(());
            }

            let captured = warden.create_snapshot().await?;
            if !global.quiet {
                eprintln!("Captured {captured} devices into {}", path.display());
                eprintln!("Review the file and remove any device you do not recognize.");
            }
            Ok(())
        }

        SnapshotCommand::Show => {
            let paths = util::load_paths(global)?;
            let snapshot = SnapshotStore::load(&paths.snapshot)?;
            let entries: Vec<(String, SnapshotEntry)> = snapshot
                .iter()
                .map(|(ip, entry)| (ip.clone(), entry.clone()))
                .collect();
            let out = output::render_list(
                &global.output,
                &entries,
                |e| SnapshotRow::from(e),
                |(ip, _)| ip.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
