//! Place identity
//!
//! This module handles:
//! - Normalizing free-text addresses into comparison keys
//! - The persisted registry of known places
//! - Resolving (address, coordinate) observations to place IDs

pub mod normalize;
pub mod registry;
pub mod resolver;


pub use normalize::normalize_address;
pub use registry::Registry;
pub use resolver::Resolver;

use crate::geo::Coordinates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One physical location the user has been picked up at or dropped off at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// Stable identifier ("loc-<n>"), never reused
    pub id: String,

    /// Normalized address currently used as the display name
    pub canonical_address: String,

    /// Other normalized addresses seen for this place; never holds the
    /// canonical address
    #[serde(default, deserialize_with = "null_as_empty")]
    pub address_variants: Vec<String>,

    /// Running mean latitude of all known-coordinate observations
    pub avg_lat: f64,

    /// Running mean longitude of all known-coordinate observations
    pub avg_lon: f64,

    /// Number of times this place was resolved
    pub visit_count: u64,

    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl Place {
    /// Centroid of the place
    pub fn centroid(&self) -> Coordinates {
        Coordinates::new(self.avg_lat, self.avg_lon)
    }

    /// Whether `address` (already normalized) maps to this place
    pub fn knows_address(&self, address: &str) -> bool {
        self.canonical_address == address || self.address_variants.iter().any(|v| v == address)
    }

    /// Every address of this place, canonical first
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.canonical_address.as_str())
            .chain(self.address_variants.iter().map(String::as_str))
    }
}

/// Read a JSON `null` list as empty.
///
/// Older registry files wrote `null` for places without variants.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
