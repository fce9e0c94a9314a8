//! Config command handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let path = global.config.clone().unwrap_or_else(config::config_path);
            if path.exists()
                && !util::confirm(
                    &format!("Overwrite the existing config at {}?", path.display()),
                    global.yes,
                )?
            {
                return Ok(());
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, config::starter_toml())?;
            if !global.quiet {
                eprintln!("Wrote starter config to {}", path.display());
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config(global)?;
            let shown = config::redacted(&cfg);
            let out = match global.output {
                OutputFormat::Json => output::render_json(&shown),
                OutputFormat::Yaml => output::render_yaml(&shown),
                OutputFormat::Table | OutputFormat::Plain => toml::to_string_pretty(&shown)?,
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
