//! Monitoring cycle handler.

use owo_colors::OwoColorize;
use tabled::Tabled;

use netwarden_core::{DeviceSource, ThreatEntry};

use crate::cli::{GlobalOpts, MonitorArgs, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ThreatRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
}

impl From<&ThreatEntry> for ThreatRow {
    fn from(entry: &ThreatEntry) -> Self {
        Self {
            name: entry.name.clone(),
            mac: entry.mac.clone(),
            ip: entry.ip.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: MonitorArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (cfg, warden) = util::build_warden(global)?;

    // fail fast instead of erroring on the first block attempt mid-cycle
    if args.block && !warden.source().supports_enforcement() {
        return Err(CliError::Unsupported {
            operation: "monitor --block".into(),
            backend: warden.source().name(),
        });
    }

    let summary = warden.run(args.block).await?;

    if !summary.report.is_empty() && !args.no_notify {
        let notifier = config::build_notifier(&cfg, global, warden.paths())?;
        notifier.notify(&summary.report).await;
    }

    render_summary(&summary, global);
    Ok(())
}

fn render_summary(summary: &netwarden_core::CycleSummary, global: &GlobalOpts) {
    if summary.report.is_empty() {
        if !global.quiet && matches!(global.output, OutputFormat::Table) {
            let line = format!("Scanned {} devices, no threats found.", summary.scanned);
            if output::should_color(&global.color) {
                println!("{}", line.green());
            } else {
                println!("{line}");
            }
        }
        return;
    }

    let out = output::render_list(
        &global.output,
        &summary.report.entries,
        |entry| ThreatRow::from(entry),
        |entry| entry.mac.clone(),
    );
    output::print_output(&out, global.quiet);

    if !global.quiet && matches!(global.output, OutputFormat::Table) {
        let line = format!(
            "{} unknown device(s) found ({} newly denied, {} already on the deny list)",
            summary.report.len(),
            summary.newly_denied,
            summary.already_denied,
        );
        if output::should_color(&global.color) {
            eprintln!("{}", line.red());
        } else {
            eprintln!("{line}");
        }
    }
}
