//! Locations command handler
//!
//! List, inspect and resolve places in the registry.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter};
use crate::geo::Coordinates;
use crate::places::{Place, Registry, Resolver};
use clap::{Args, Subcommand};
use std::path::Path;
use tracing::info;

/// Locations command arguments
#[derive(Args)]
pub struct LocationsArgs {
    #[command(subcommand)]
    pub command: Option<LocationsCommand>,
}

/// Locations subcommands
#[derive(Subcommand)]
pub enum LocationsCommand {
    /// List all saved places
    List {
        /// Output format (json, text); defaults to display.format
        #[arg(short = 'f', long)]
        format: Option<String>,
    },
    /// Show a single place with all its address variants
    Show {
        /// Place ID (e.g. loc-3)
        id: String,
    },
    /// Resolve an address and coordinate to a place, creating it if new
    Resolve {
        /// Address as it appears on the trip
        address: String,

        /// Latitude in degrees
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in degrees
        #[arg(allow_negative_numbers = true)]
        lon: f64,

        /// Print the result without saving the registry
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the registry file path
    Path,
}

/// Run the locations command
pub fn run(args: LocationsArgs, config: &Config, registry_path: &Path) -> Result<()> {
    let command = args.command.unwrap_or(LocationsCommand::List { format: None });

    match command {
        LocationsCommand::List { format } => list_places(format.as_deref(), config, registry_path),
        LocationsCommand::Show { id } => show_place(&id, registry_path),
        LocationsCommand::Resolve {
            address,
            lat,
            lon,
            dry_run,
        } => resolve_place(&address, Coordinates::new(lat, lon), dry_run, registry_path),
        LocationsCommand::Path => {
            println!("{}", registry_path.display());
            Ok(())
        }
    }
}

/// List all places
fn list_places(format: Option<&str>, config: &Config, registry_path: &Path) -> Result<()> {
    let format_name = format.unwrap_or(config.display.format.as_str());
    let formatter = get_formatter(format_name).ok_or_else(|| {
        let known: Vec<String> = available_formats().into_iter().map(|f| f.name).collect();
        Error::Config(format!(
            "Unknown format: {} (available: {})",
            format_name,
            known.join(", ")
        ))
    })?;

    let registry = Registry::load_from(registry_path)?;
    print!("{}", formatter.format(registry.places(), config)?);

    if registry.is_empty() && formatter.name() == "text" {
        println!("\nRun 'ride-places ingest <trips.json>' to build places from trip data.");
    }

    Ok(())
}

/// Show one place
fn show_place(id: &str, registry_path: &Path) -> Result<()> {
    let registry = Registry::load_from(registry_path)?;
    let place = registry
        .get(id)
        .ok_or_else(|| Error::NotFound(format!("Location not found: {}", id)))?;

    print_place(place);
    Ok(())
}

fn print_place(place: &Place) {
    println!("Location: {}", place.id);
    println!("Address: {}", place.canonical_address);
    println!("Coordinates: {}", place.centroid());
    println!("Visits: {}", place.visit_count);
    println!("First seen: {}", place.first_seen.to_rfc3339());
    println!("Last seen: {}", place.last_seen.to_rfc3339());

    if !place.address_variants.is_empty() {
        println!("\nAlso known as:");
        for variant in &place.address_variants {
            println!("  {}", variant);
        }
    }
}

/// Resolve a single observation
fn resolve_place(address: &str, coords: Coordinates, dry_run: bool, registry_path: &Path) -> Result<()> {
    coords.validate()?;

    let mut registry = Registry::load_from(registry_path)?;
    let id = Resolver::new(&mut registry).resolve(address, coords.lat, coords.lon);

    let Some(id) = id else {
        println!("No location: coordinates ({}) are treated as unknown", coords);
        return Ok(());
    };

    if let Some(place) = registry.get(&id) {
        print_place(place);
    }

    if dry_run {
        println!("\n(dry run, registry not saved)");
    } else {
        registry.save_to(registry_path)?;
        info!(path = %registry_path.display(), places = registry.len(), "Locations saved");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_saves_registry() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("locations.json");

        resolve_place("123 Test Street", Coordinates::new(41.4089, -75.6624), false, &path).unwrap();
        resolve_place("123 test street", Coordinates::new(41.4089, -75.6624), false, &path).unwrap();

        let registry = Registry::load_from(&path).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("loc-1").unwrap().visit_count, 2);
    }

    #[test]
    fn test_resolve_dry_run_does_not_save() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("locations.json");

        resolve_place("123 Test Street", Coordinates::new(41.4089, -75.6624), true, &path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_resolve_unknown_coordinates_does_not_save() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("locations.json");

        resolve_place("Somewhere", Coordinates::new(0.0, 0.0), false, &path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_resolve_rejects_out_of_range() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("locations.json");

        let result = resolve_place("Somewhere", Coordinates::new(123.0, 0.0), false, &path);
        assert!(matches!(result, Err(Error::InvalidCoordinates(_))));
    }

    #[test]
    fn test_show_unknown_place() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("locations.json");

        let result = show_place("loc-1", &path);
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_list_unknown_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("locations.json");

        let result = list_places(Some("gpx"), &Config::default(), &path);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
