//! Trip records
//!
//! Trips arrive already fetched and parsed, as a JSON array. This module
//! only reads them, attaches place IDs and writes them back out.

pub mod ingest;

pub use ingest::{assign_places, IngestSummary};

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Trip status as reported by the trip API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TripStatus {
    #[default]
    Unknown,
    Completed,
    Canceled,
}

impl TripStatus {
    /// Parse a status string; unrecognized values are `Unknown`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "COMPLETED" => Self::Completed,
            "CANCELED" => Self::Canceled,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for TripStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "UNKNOWN"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Canceled => write!(f, "CANCELED"),
        }
    }
}

impl From<String> for TripStatus {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<TripStatus> for String {
    fn from(status: TripStatus) -> Self {
        status.to_string()
    }
}

/// A single ride
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Trip {
    pub uuid: String,
    pub begin_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: TripStatus,
    pub fare: f64,
    pub driver: String,
    pub vehicle_type: String,
    pub distance: f64,
    /// Minutes
    pub duration: f64,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub pickup_lat: f64,
    pub pickup_lon: f64,
    pub dropoff_lat: f64,
    pub dropoff_lon: f64,
    pub rating: u8,
    pub map_url: String,

    /// Place ID of the pickup, empty when unresolved
    #[serde(rename = "pickupLocationID")]
    pub pickup_location_id: String,

    /// Place ID of the dropoff, empty when unresolved
    #[serde(rename = "dropoffLocationID")]
    pub dropoff_location_id: String,
}

impl Trip {
    /// Whether the trip reached its destination
    pub fn is_completed(&self) -> bool {
        self.status == TripStatus::Completed
    }
}

/// Load trips from a JSON array file
pub fn load_trips(path: &Path) -> Result<Vec<Trip>> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::Storage(format!("Failed to read trips file {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        Error::Storage(format!("Failed to parse trips file {}: {}", path.display(), e))
    })
}

/// Write trips as pretty-printed JSON
pub fn write_trips<W: Write>(mut writer: W, trips: &[Trip]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, trips)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
