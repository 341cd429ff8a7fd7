//! Place assignment for a batch of trips
//!
//! Each completed trip resolves its pickup and then its dropoff. Endpoints
//! without coordinates stay unassigned; they never abort the batch.

use super::Trip;
use crate::places::Resolver;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Counters for one ingestion batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    /// Trips in the batch
    pub trips: usize,
    /// Trips with COMPLETED status
    pub completed: usize,
    /// Endpoints that received a place ID
    pub resolved: usize,
    /// Endpoints skipped for lack of coordinates
    pub unresolved: usize,
    /// Places added to the registry
    pub places_created: usize,
}

/// Resolve pickup and dropoff places for every completed trip
pub fn assign_places(trips: &mut [Trip], resolver: &mut Resolver<'_>) -> IngestSummary {
    let places_before = resolver.registry().len();
    let mut summary = IngestSummary {
        trips: trips.len(),
        ..Default::default()
    };

    for (i, trip) in trips.iter_mut().enumerate() {
        if !trip.is_completed() {
            debug!(uuid = %trip.uuid, status = %trip.status, "Skipping trip");
            continue;
        }
        summary.completed += 1;

        // Both ends of a trip share one timestamp
        let now = Utc::now();

        let pickup = resolver.resolve_at(&trip.pickup_address, trip.pickup_lat, trip.pickup_lon, now);
        let dropoff =
            resolver.resolve_at(&trip.dropoff_address, trip.dropoff_lat, trip.dropoff_lon, now);

        for (end, id) in [("pickup", &pickup), ("dropoff", &dropoff)] {
            match id {
                Some(_) => summary.resolved += 1,
                None => {
                    summary.unresolved += 1;
                    warn!(uuid = %trip.uuid, end, "Trip endpoint has no coordinates");
                }
            }
        }

        trip.pickup_location_id = pickup.unwrap_or_default();
        trip.dropoff_location_id = dropoff.unwrap_or_default();

        debug!(
            current = i + 1,
            total = summary.trips,
            uuid = %trip.uuid,
            pickup = %trip.pickup_location_id,
            dropoff = %trip.dropoff_location_id,
            "Processed trip"
        );
    }

    summary.places_created = resolver.registry().len() - places_before;

    info!(
        trips = summary.trips,
        completed = summary.completed,
        resolved = summary.resolved,
        unresolved = summary.unresolved,
        places_created = summary.places_created,
        "Trips assigned to places"
    );

    summary
}
