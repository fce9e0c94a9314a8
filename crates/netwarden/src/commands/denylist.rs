//! Deny-list inspection handler.

use chrono::{TimeZone, Utc};
use tabled::Tabled;

use netwarden_core::{DenyList, DenyRecord};

use crate::cli::{DenylistArgs, DenylistCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DenyRow {
    #[tabled(rename = "Blocked at")]
    blocked_at: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Type")]
    kind: String,
}

impl From<&DenyRecord> for DenyRow {
    fn from(r: &DenyRecord) -> Self {
        let blocked_at = Utc
            .timestamp_opt(r.blocked_at, 0)
            .single()
            .map_or_else(|| r.blocked_at.to_string(), |t| t.to_rfc3339());
        Self {
            blocked_at,
            name: r.name.clone(),
            mac: r.mac.to_string(),
            ip: r.ip.clone().unwrap_or_else(|| "-".into()),
            kind: r.kind.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &DenylistArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        DenylistCommand::List => {
            let paths = util::load_paths(global)?;
            let deny_list = DenyList::load(&paths.deny_list)?;
            let records: Vec<DenyRecord> = deny_list.iter().map(|(_, r)| r.clone()).collect();
            if records.is_empty() {
                if !global.quiet {
                    eprintln!("The deny list is empty.");
                }
                return Ok(());
            }
            let out = output::render_list(&global.output, &records, |r| DenyRow::from(r), |r| {
                r.mac.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
