//! Drumbeat CLI — the main entry point.
//!
//! Commands:
//! - `run`     — Start the broadcast loop
//! - `check`   — Validate configuration and message catalog
//! - `onboard` — Write starter configuration files

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "drumbeat",
    about = "Drumbeat — scheduled message broadcast runtime",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the broadcast loop
    Run {
        /// Config file path (default: config.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Message catalog path (overrides the config file setting)
        #[arg(short, long)]
        messages: Option<PathBuf>,
    },

    /// Validate configuration and message catalog
    Check {
        /// Config file path (default: config.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Also resolve the identity behind each configured token
        #[arg(long)]
        probe: bool,
    },

    /// Write starter configuration files
    Onboard,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run { config, messages } => commands::run::run(config, messages).await?,
        Commands::Check { config, probe } => commands::check::run(config, probe).await?,
        Commands::Onboard => commands::onboard::run().await?,
    }

    Ok(())
}
