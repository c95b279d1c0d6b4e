//! # saathi CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use saathi_cli::config::{run_config, ConfigArgs};
use saathi_cli::token::{run_token, TokenArgs};

/// Safar Saathi development CLI.
///
/// Issues and verifies bearer tokens with the shared secret and checks the
/// API server's environment configuration.
#[derive(Parser, Debug)]
#[command(name = "saathi", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Issue or verify bearer tokens.
    Token(TokenArgs),

    /// Inspect the API server configuration.
    Config(ConfigArgs),
}

fn main() -> ExitCode {
    // Loaded before parsing so `--secret` can fall back to JWT_SECRET from .env.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let result = match cli.command {
        Commands::Token(args) => run_token(&args),
        Commands::Config(args) => run_config(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
