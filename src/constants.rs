//! Centralized constants for the ride-places crate
//!
//! Fixed parameters of place resolution live here rather than in the
//! config file; changing them changes which places merge.

/// Geographic constants
pub mod geo {
    /// Earth radius used by the haversine distance, in kilometers
    pub const EARTH_RADIUS_KM: f64 = 6371.0;
}

/// Place resolution parameters
pub mod places {
    /// Observations closer than this to a place's centroid join that place
    pub const CLUSTER_RADIUS_METERS: f64 = 25.0;

    /// Prefix of generated place identifiers ("loc-1", "loc-2", ...)
    pub const ID_PREFIX: &str = "loc-";

    /// First identifier number handed out by an empty registry
    pub const FIRST_ID: u64 = 1;
}

/// Storage locations
pub mod storage {
    /// Application directory name (under the user config dir)
    pub const APP_DIR_NAME: &str = "ride-places";

    /// Registry file name
    pub const LOCATIONS_FILE_NAME: &str = "locations.json";
}
