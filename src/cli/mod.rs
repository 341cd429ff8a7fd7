//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod ingest;
pub mod locations;

use crate::config::Config;
use crate::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Deduplicated pickup/dropoff places from ride history
#[derive(Parser)]
#[command(name = "ride-places")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Registry file to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    pub locations: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List, inspect and resolve saved places
    Locations(locations::LocationsArgs),

    /// Assign places to a file of fetched trips
    Ingest(ingest::IngestArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Locations(args) => {
            let (config, registry_path) = setup(cli.locations)?;
            locations::run(args, &config, &registry_path)
        }
        Commands::Ingest(args) => {
            let (_, registry_path) = setup(cli.locations)?;
            ingest::run(args, &registry_path)
        }
        Commands::Config(args) => config::run(args),
    }
}

/// Load config, start logging and pick the registry path
fn setup(locations: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let config = Config::load()?;
    init_logging(&config.logging.level);

    let registry_path = match locations {
        Some(path) => path,
        None => config.locations_path()?,
    };

    Ok((config, registry_path))
}

/// Initialize logging to stderr; RUST_LOG overrides the configured level
fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
