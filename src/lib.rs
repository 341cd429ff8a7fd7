//! ride-places: Deduplicated places from ride history
//!
//! A library and CLI tool that turns the noisy pickup/dropoff addresses and
//! approximate coordinates of past rides into a stable set of places.
//!
//! ## Features
//!
//! - Address normalization (case, punctuation, street abbreviations)
//! - Haversine distance clustering within 25 meters
//! - Vote-based choice of each place's display address
//! - Atomic JSON registry shared across runs
//! - Batch place assignment for fetched trips
//!
//! ## Quick Start
//!
//! ```rust
//! use ride_places::places::{Registry, Resolver};
//!
//! let mut registry = Registry::default();
//! let mut resolver = Resolver::new(&mut registry);
//!
//! let home = resolver.resolve("123 Test Street", 41.4089, -75.6624);
//! let again = resolver.resolve("123 test street,", 41.4089, -75.6624);
//! assert_eq!(home, again);
//!
//! // (0, 0) means "no location" and never creates a place
//! assert_eq!(resolver.resolve("Nowhere", 0.0, 0.0), None);
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod geo;
pub mod places;
pub mod trips;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use geo::{distance_meters, Coordinates};
pub use places::{normalize_address, Place, Registry, Resolver};
pub use trips::{Trip, TripStatus};
