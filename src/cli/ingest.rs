//! Ingest command handler
//!
//! Assigns pickup/dropoff places to a batch of fetched trips. The registry
//! is loaded once before the batch and saved once after it.

use crate::error::{Error, Result};
use crate::places::{Registry, Resolver};
use crate::trips::{assign_places, load_trips, write_trips, IngestSummary};
use clap::Args;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing::info;

/// Ingest command arguments
#[derive(Args)]
pub struct IngestArgs {
    /// JSON file with an array of trips
    pub trips: PathBuf,

    /// Write annotated trips here instead of stdout
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Resolve places without saving the registry
    #[arg(long)]
    pub dry_run: bool,
}

/// Run the ingest command
pub fn run(args: IngestArgs, registry_path: &Path) -> Result<()> {
    let summary = ingest_file(&args, registry_path)?;

    eprintln!(
        "Processed {} trips ({} completed): {} endpoints resolved, {} without coordinates, {} new locations",
        summary.trips, summary.completed, summary.resolved, summary.unresolved, summary.places_created
    );

    Ok(())
}

fn ingest_file(args: &IngestArgs, registry_path: &Path) -> Result<IngestSummary> {
    let mut trips = load_trips(&args.trips)?;
    info!(path = %args.trips.display(), count = trips.len(), "Trips loaded");

    let mut registry = Registry::load_from(registry_path)?;
    info!(count = registry.len(), "Locations loaded");

    let summary = {
        let mut resolver = Resolver::new(&mut registry);
        assign_places(&mut trips, &mut resolver)
    };

    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                Error::Storage(format!("Failed to write trips file {}: {}", path.display(), e))
            })?;
            write_trips(BufWriter::new(file), &trips)?
        }
        None => write_trips(io::stdout().lock(), &trips)?,
    }

    if args.dry_run {
        info!("Dry run, locations not saved");
    } else {
        registry.save_to(registry_path)?;
        info!(count = registry.len(), path = %registry_path.display(), "Locations saved");
    }

    Ok(summary)
}
