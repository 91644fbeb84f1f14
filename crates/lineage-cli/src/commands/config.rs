//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::CliConfig;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub async fn execute_config(
    args: ConfigArgs,
    config: &CliConfig,
    explicit: Option<&Path>,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            if formatter.is_json() {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                let path = CliConfig::path(explicit)?;
                println!("{}", formatter.info(&format!("Configuration file: {}", path.display())));
                println!("{}", config.to_toml()?);
            }
        }
        ConfigAction::Init { force } => {
            let path = CliConfig::path(explicit)?;
            if path.exists() && !force {
                return Err(CliError::Config(format!(
                    "{} already exists; pass --force to overwrite",
                    path.display()
                )));
            }
            let written = CliConfig::default().save(Some(&path))?;
            println!(
                "{}",
                formatter.success(&format!("Wrote default configuration to {}", written.display()))
            );
        }
    }

    Ok(())
}
