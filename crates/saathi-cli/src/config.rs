//! # Config Subcommand
//!
//! Loads the API server configuration exactly as the server would and
//! prints it with credentials redacted.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use saathi_api::config::AppConfig;

/// Arguments for the `saathi config` subcommand.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate the environment and print the resolved configuration.
    Check,
}

/// Execute the config subcommand.
pub fn run_config(args: &ConfigArgs) -> Result<u8> {
    match args.command {
        ConfigCommand::Check => {
            let report = check_config(|var| std::env::var(var).ok())?;
            println!("{report}");
            Ok(0)
        }
    }
}

/// Load configuration through `lookup` and render a redacted report.
pub fn check_config<F>(lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let config = AppConfig::from_lookup(lookup).context("configuration invalid")?;
    config.warn_on_defaults();

    let mut report = format!("OK: configuration valid\n{config:#?}");
    if !config.defaults_used.is_empty() {
        report.push_str(&format!(
            "\nWARN: development defaults in use for {}",
            config.defaults_used.join(", ")
        ));
    }
    Ok(report)
}
