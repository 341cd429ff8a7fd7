//! Place resolution
//!
//! Maps an observed (address, latitude, longitude) triple to a place in the
//! registry, creating one when nothing matches.
//!
//! Matching order:
//! 1. Exact normalized-address match against any place's canonical address
//!    or variants (first in registry order)
//! 2. First place whose centroid is within [`CLUSTER_RADIUS_METERS`]
//! 3. Otherwise a new place is appended
//!
//! Every matched observation also casts a vote for its address. An address
//! with strictly more votes than the current canonical address takes over
//! as the display name; ties keep the incumbent.

use super::normalize::normalize_address;
use super::{Place, Registry};
use crate::constants::places::CLUSTER_RADIUS_METERS;
use crate::geo::Coordinates;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

/// Resolves observations against a registry it mutates in place
///
/// Not safe to share between threads; one resolver handles one batch.
#[derive(Debug)]
pub struct Resolver<'a> {
    registry: &'a mut Registry,

    /// Normalized address -> number of references, rebuilt from the registry
    address_refs: HashMap<String, usize>,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over `registry`
    pub fn new(registry: &'a mut Registry) -> Self {
        let mut resolver = Self {
            registry,
            address_refs: HashMap::new(),
        };
        resolver.rebuild_address_refs();
        resolver
    }

    /// The registry being resolved against
    pub fn registry(&self) -> &Registry {
        &*self.registry
    }

    /// Current reference count of a normalized address
    pub fn address_refs(&self, address: &str) -> usize {
        self.address_refs.get(address).copied().unwrap_or(0)
    }

    /// Resolve an observation to a place ID, stamping it with the current time
    ///
    /// Returns `None` and leaves the registry untouched when the coordinate
    /// is the (0, 0) "unknown" sentinel.
    pub fn resolve(&mut self, raw_address: &str, lat: f64, lon: f64) -> Option<String> {
        self.resolve_at(raw_address, lat, lon, Utc::now())
    }

    /// Resolve an observation to a place ID using `now` as the visit time
    pub fn resolve_at(
        &mut self,
        raw_address: &str,
        lat: f64,
        lon: f64,
        now: DateTime<Utc>,
    ) -> Option<String> {
        let address = normalize_address(raw_address);
        let coords = Coordinates::new(lat, lon);

        if coords.is_unknown() || !coords.is_finite() {
            debug!(address = %address, "Skipping observation without coordinates");
            return None;
        }

        if let Some(index) = self.find_by_address(&address) {
            debug!(address = %address, id = %self.registry.places()[index].id, "Exact address match");
            return Some(self.update_place(index, &address, coords, now));
        }

        if let Some(index) = self.find_nearby(coords) {
            debug!(address = %address, id = %self.registry.places()[index].id, "Proximity match");
            return Some(self.update_place(index, &address, coords, now));
        }

        Some(self.create_place(address, coords, now))
    }

    fn rebuild_address_refs(&mut self) {
        self.address_refs.clear();
        for place in self.registry.places() {
            for address in place.addresses() {
                *self.address_refs.entry(address.to_string()).or_insert(0) += 1;
            }
        }
    }

    fn find_by_address(&self, address: &str) -> Option<usize> {
        self.registry
            .places()
            .iter()
            .position(|place| place.knows_address(address))
    }

    /// First place in registry order within the cluster radius, not the nearest
    fn find_nearby(&self, coords: Coordinates) -> Option<usize> {
        self.registry
            .places()
            .iter()
            .position(|place| place.centroid().distance_to(coords) <= CLUSTER_RADIUS_METERS)
    }

    fn update_place(
        &mut self,
        index: usize,
        address: &str,
        coords: Coordinates,
        now: DateTime<Utc>,
    ) -> String {
        let canonical = self.registry.places()[index].canonical_address.clone();

        // The canonical reference is released while the new address is
        // registered and taken back afterwards, so its own count is unchanged.
        self.release(&canonical);

        let place = self.registry.place_mut(index);
        place.visit_count += 1;
        place.last_seen = now;
        if address != canonical && !place.address_variants.iter().any(|v| v == address) {
            place.address_variants.push(address.to_string());
        }
        absorb_coordinates(place, coords);

        self.acquire(address);
        self.acquire(&canonical);

        if self.address_refs(address) > self.address_refs(&canonical) {
            debug!(from = %canonical, to = %address, "Promoting canonical address");
            promote(self.registry.place_mut(index), address);
        }

        self.registry.places()[index].id.clone()
    }

    fn create_place(&mut self, address: String, coords: Coordinates, now: DateTime<Utc>) -> String {
        let id = self.registry.allocate_id();
        debug!(id = %id, address = %address, "Creating place");

        self.acquire(&address);
        self.registry.push(Place {
            id: id.clone(),
            canonical_address: address,
            address_variants: Vec::new(),
            avg_lat: coords.lat,
            avg_lon: coords.lon,
            visit_count: 1,
            first_seen: now,
            last_seen: now,
        });

        id
    }

    fn acquire(&mut self, address: &str) {
        *self.address_refs.entry(address.to_string()).or_insert(0) += 1;
    }

    fn release(&mut self, address: &str) {
        if let Some(count) = self.address_refs.get_mut(address) {
            *count = count.saturating_sub(1);
        }
    }
}

/// Fold an observation into the running mean; `visit_count` already
/// includes it. Unknown coordinates leave the centroid alone.
fn absorb_coordinates(place: &mut Place, coords: Coordinates) {
    if coords.is_unknown() {
        return;
    }

    let n = place.visit_count as f64;
    place.avg_lat = (place.avg_lat * (n - 1.0) + coords.lat) / n;
    place.avg_lon = (place.avg_lon * (n - 1.0) + coords.lon) / n;
}

/// Make `address` canonical, moving the old canonical into the variants.
fn promote(place: &mut Place, address: &str) {
    place.address_variants.retain(|v| v != address);
    let previous = std::mem::replace(&mut place.canonical_address, address.to_string());
    if !place.address_variants.contains(&previous) {
        place.address_variants.push(previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    fn place(id: &str, canonical: &str, variants: &[&str], lat: f64, lon: f64, visits: u64) -> Place {
        Place {
            id: id.to_string(),
            canonical_address: canonical.to_string(),
            address_variants: variants.iter().map(|v| v.to_string()).collect(),
            avg_lat: lat,
            avg_lon: lon,
            visit_count: visits,
            first_seen: at(0),
            last_seen: at(0),
        }
    }

    fn registry_with(places: Vec<Place>) -> Registry {
        let mut registry = Registry::default();
        for p in places {
            registry.allocate_id();
            registry.push(p);
        }
        registry
    }

    #[test]
    fn test_create_first_place() {
        let mut registry = Registry::default();
        let mut resolver = Resolver::new(&mut registry);

        let id = resolver.resolve_at("123 Test Street", 41.4089, -75.6624, at(1));
        assert_eq!(id.as_deref(), Some("loc-1"));

        let place = registry.get("loc-1").unwrap();
        assert_eq!(place.canonical_address, "123 test street");
        assert!(place.address_variants.is_empty());
        assert_eq!(place.visit_count, 1);
        assert_eq!(place.avg_lat, 41.4089);
        assert_eq!(place.avg_lon, -75.6624);
        assert_eq!(place.first_seen, at(1));
        assert_eq!(place.last_seen, at(1));
        assert_eq!(registry.next_id(), 2);
    }

    #[test]
    fn test_zero_coordinates_are_ignored() {
        let mut registry = registry_with(vec![place("loc-1", "invalid location", &[], 41.4089, -75.6624, 3)]);
        let before = registry.clone();

        let mut resolver = Resolver::new(&mut registry);
        assert_eq!(resolver.resolve("Invalid Location", 0.0, 0.0), None);
        assert_eq!(resolver.address_refs("invalid location"), 1);

        assert_eq!(registry, before);
    }

    #[test]
    fn test_zero_coordinates_never_create() {
        let mut registry = Registry::default();
        let mut resolver = Resolver::new(&mut registry);

        assert_eq!(resolver.resolve("Somewhere", 0.0, 0.0), None);
        assert!(registry.is_empty());
        assert_eq!(registry.next_id(), 1);
    }

    #[test]
    fn test_non_finite_coordinates_are_ignored() {
        let mut registry = registry_with(vec![place("loc-1", "somewhere", &[], 41.4089, -75.6624, 1)]);
        let before = registry.clone();

        let mut resolver = Resolver::new(&mut registry);
        assert_eq!(resolver.resolve("Somewhere", f64::NAN, 1.0), None);
        assert_eq!(resolver.resolve("Elsewhere", 41.4089, f64::INFINITY), None);
        assert_eq!(resolver.resolve("Elsewhere", f64::NEG_INFINITY, -75.6624), None);

        assert_eq!(registry, before);
    }

    #[test]
    fn test_exact_match_updates_centroid_and_visits() {
        let mut registry = registry_with(vec![place("loc-1", "123 test street", &[], 41.4089, -75.6624, 1)]);
        let mut resolver = Resolver::new(&mut registry);

        let id = resolver.resolve_at("123 TEST STREET", 41.4090, -75.6625, at(2));
        assert_eq!(id.as_deref(), Some("loc-1"));

        let place = registry.get("loc-1").unwrap();
        assert_eq!(place.visit_count, 2);
        assert_abs_diff_eq!(place.avg_lat, 41.40895, epsilon = 1e-9);
        assert_abs_diff_eq!(place.avg_lon, -75.66245, epsilon = 1e-9);
        assert_eq!(place.last_seen, at(2));
        assert_eq!(place.first_seen, at(0));
    }

    #[test]
    fn test_exact_match_wins_over_distance() {
        // Same text far away still resolves to the known place
        let mut registry = registry_with(vec![place("loc-1", "airport", &[], 41.4089, -75.6624, 1)]);
        let mut resolver = Resolver::new(&mut registry);

        let id = resolver.resolve_at("Airport", 40.0, -74.0, at(1));
        assert_eq!(id.as_deref(), Some("loc-1"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_variant_match() {
        let mut registry = registry_with(vec![
            place("loc-1", "1725 slough avenue", &[], 41.4089, -75.6624, 55),
            place("loc-2", "123 kellum court", &["michael scott residence"], 41.4120, -75.6580, 68),
        ]);
        let mut resolver = Resolver::new(&mut registry);

        let id = resolver.resolve_at("Michael Scott Residence", 41.4120, -75.6580, at(1));
        assert_eq!(id.as_deref(), Some("loc-2"));
        assert_eq!(registry.get("loc-2").unwrap().visit_count, 69);
    }

    #[test]
    fn test_exact_match_takes_first_in_registry_order() {
        // A corrupted registry may list the same address twice
        let mut registry = registry_with(vec![
            place("loc-1", "shared", &[], 41.0, -75.0, 1),
            place("loc-2", "other", &["shared"], 42.0, -76.0, 1),
        ]);
        let mut resolver = Resolver::new(&mut registry);

        assert_eq!(resolver.resolve_at("Shared", 42.0, -76.0, at(1)).as_deref(), Some("loc-1"));
    }

    #[test]
    fn test_proximity_match_adds_variant() {
        let mut registry = registry_with(vec![place("loc-1", "123 test street", &[], 41.4089, -75.6624, 1)]);
        let mut resolver = Resolver::new(&mut registry);

        let id = resolver.resolve_at("124 Test Street", 41.408905, -75.662405, at(1));
        assert_eq!(id.as_deref(), Some("loc-1"));

        let place = registry.get("loc-1").unwrap();
        assert_eq!(place.visit_count, 2);
        assert_eq!(place.address_variants, vec!["124 test street"]);
        assert_eq!(place.canonical_address, "123 test street");
    }

    #[test]
    fn test_proximity_takes_first_not_nearest() {
        // Both centroids are within 25 m; the earlier one wins
        let mut registry = registry_with(vec![
            place("loc-1", "first", &[], 41.40900, -75.6624, 1),
            place("loc-2", "second", &[], 41.40910, -75.6624, 1),
        ]);
        let mut resolver = Resolver::new(&mut registry);

        let id = resolver.resolve_at("elsewhere", 41.40912, -75.6624, at(1));
        assert_eq!(id.as_deref(), Some("loc-1"));
    }

    #[test]
    fn test_outside_radius_creates_new_place() {
        let mut registry = registry_with(vec![place("loc-1", "123 test street", &[], 41.4089, -75.6624, 1)]);
        let mut resolver = Resolver::new(&mut registry);

        // ~33 m north
        let id = resolver.resolve_at("125 Test Street", 41.4092, -75.6624, at(1));
        assert_eq!(id.as_deref(), Some("loc-2"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut registry = Registry::default();
        registry.allocate_id();
        registry.allocate_id();
        let mut resolver = Resolver::new(&mut registry);

        let id = resolver.resolve_at("New York Times Square", 40.7580, -73.9855, at(1));
        assert_eq!(id.as_deref(), Some("loc-3"));
        assert_eq!(registry.next_id(), 4);
    }

    #[test]
    fn test_repeat_address_does_not_add_variant() {
        let mut registry = Registry::default();
        let mut resolver = Resolver::new(&mut registry);

        resolver.resolve_at("Rua Teste, 123", 41.4089, -75.6624, at(1));
        resolver.resolve_at("rua teste 123", 41.408905, -75.662405, at(2));
        resolver.resolve_at("RUA TESTE 123", 41.4089, -75.6624, at(3));

        let place = registry.get("loc-1").unwrap();
        assert_eq!(place.visit_count, 3);
        assert!(place.address_variants.is_empty());
    }

    #[test]
    fn test_address_refs_rebuilt_from_registry() {
        let mut registry = registry_with(vec![
            place("loc-1", "a", &["b", "c"], 41.0, -75.0, 4),
            place("loc-2", "d", &["b"], 42.0, -76.0, 2),
        ]);
        let resolver = Resolver::new(&mut registry);

        assert_eq!(resolver.address_refs("a"), 1);
        assert_eq!(resolver.address_refs("b"), 2);
        assert_eq!(resolver.address_refs("c"), 1);
        assert_eq!(resolver.address_refs("d"), 1);
        assert_eq!(resolver.address_refs("missing"), 0);
    }

    #[test]
    fn test_tie_keeps_canonical() {
        let mut registry = Registry::default();
        let mut resolver = Resolver::new(&mut registry);

        resolver.resolve_at("Office", 41.4089, -75.6624, at(1));
        resolver.resolve_at("Main Office", 41.408901, -75.662401, at(2));

        // One vote each
        assert_eq!(resolver.address_refs("office"), 1);
        assert_eq!(resolver.address_refs("main office"), 1);
        assert_eq!(registry.get("loc-1").unwrap().canonical_address, "office");
    }

    #[test]
    fn test_majority_promotes_canonical() {
        let mut registry = Registry::default();
        let mut resolver = Resolver::new(&mut registry);

        resolver.resolve_at("Office", 41.4089, -75.6624, at(1));
        resolver.resolve_at("Main Office", 41.408901, -75.662401, at(2));
        resolver.resolve_at("Main Office", 41.408901, -75.662401, at(3));

        let place = registry.get("loc-1").unwrap();
        assert_eq!(place.canonical_address, "main office");
        assert_eq!(place.address_variants, vec!["office"]);
        assert_eq!(place.visit_count, 3);
    }

    #[test]
    fn test_promoted_place_still_matches_old_name() {
        let mut registry = Registry::default();
        let mut resolver = Resolver::new(&mut registry);

        resolver.resolve_at("Office", 41.4089, -75.6624, at(1));
        resolver.resolve_at("Main Office", 41.4089, -75.6624, at(2));
        resolver.resolve_at("Main Office", 41.4089, -75.6624, at(3));

        // Far away, so only the text can match
        let id = resolver.resolve_at("office", 10.0, 10.0, at(4));
        assert_eq!(id.as_deref(), Some("loc-1"));
    }

    #[test]
    fn test_canonical_never_listed_as_variant() {
        let mut registry = Registry::default();
        let mut resolver = Resolver::new(&mut registry);

        let names = ["A St", "B St", "B St", "A St", "A St", "C St", "B St", "B St"];
        for (i, name) in names.iter().enumerate() {
            resolver.resolve_at(name, 41.4089, -75.6624, at(i as u32));
        }

        let place = registry.get("loc-1").unwrap();
        assert!(!place.address_variants.contains(&place.canonical_address));
        let mut all: Vec<&str> = place.addresses().collect();
        all.sort_unstable();
        assert_eq!(all, vec!["a st", "b st", "c st"]);
    }

    #[test]
    fn test_absorb_skips_unknown_coordinates() {
        let mut p = place("loc-1", "a", &[], 41.0, -75.0, 2);
        absorb_coordinates(&mut p, Coordinates::new(0.0, 0.0));
        assert_eq!(p.avg_lat, 41.0);
        assert_eq!(p.avg_lon, -75.0);
    }

    #[test]
    fn test_absorb_running_mean() {
        let mut p = place("loc-1", "a", &[], 10.0, 20.0, 1);
        for (i, (lat, lon)) in [(20.0, 40.0), (30.0, 60.0)].into_iter().enumerate() {
            p.visit_count = i as u64 + 2;
            absorb_coordinates(&mut p, Coordinates::new(lat, lon));
        }
        assert_abs_diff_eq!(p.avg_lat, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.avg_lon, 40.0, epsilon = 1e-9);
    }
}
