//! Place registry storage
//!
//! The registry is the full list of known places plus the next ID to hand
//! out. It is loaded once per run, mutated in memory by the resolver and
//! written back as a whole at the end of the run.
//! Default location: ~/.config/ride-places/locations.json

use super::{null_as_empty, Place};
use crate::constants::places::{FIRST_ID, ID_PREFIX};
use crate::constants::storage::{APP_DIR_NAME, LOCATIONS_FILE_NAME};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Persisted collection of places
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(rename = "locations", default, deserialize_with = "null_as_empty")]
    places: Vec<Place>,

    #[serde(rename = "nextID")]
    next_id: u64,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            places: Vec::new(),
            next_id: FIRST_ID,
        }
    }
}

impl Registry {
    /// Get the default registry file path
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME).join(LOCATIONS_FILE_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Load a registry from `path`
    ///
    /// A missing file yields an empty registry. Any other read failure or
    /// malformed JSON is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No registry file, starting empty");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(Error::Storage(format!(
                    "Failed to read registry file {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let registry: Self = serde_json::from_str(&content).map_err(|e| {
            Error::Storage(format!(
                "Failed to parse registry file {}: {}",
                path.display(),
                e
            ))
        })?;

        debug!(path = %path.display(), places = registry.len(), "Registry loaded");
        Ok(registry)
    }

    /// Save the registry to `path`, replacing any existing file
    ///
    /// The JSON is written to a temporary file next to the target and then
    /// renamed over it, so readers never see a partial file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        fs::create_dir_all(parent).map_err(|e| {
            Error::Storage(format!(
                "Failed to create registry directory {}: {}",
                parent.display(),
                e
            ))
        })?;

        // JSON has no NaN or infinity; serde_json would write null and the
        // file could not be loaded again
        if let Some(place) = self.places.iter().find(|p| !p.centroid().is_finite()) {
            return Err(Error::Storage(format!(
                "Refusing to save place {} with non-finite centroid ({}, {})",
                place.id, place.avg_lat, place.avg_lon
            )));
        }

        let content = serde_json::to_string_pretty(self)?;

        // NamedTempFile is created 0600 on unix
        let mut temp = NamedTempFile::new_in(parent).map_err(|e| {
            Error::Storage(format!("Failed to create temporary registry file: {}", e))
        })?;
        temp.write_all(content.as_bytes())?;
        temp.as_file().sync_all()?;

        temp.persist(path).map_err(|e| {
            Error::Storage(format!(
                "Failed to write registry file {}: {}",
                path.display(),
                e.error
            ))
        })?;

        debug!(path = %path.display(), places = self.len(), "Registry saved");
        Ok(())
    }

    /// All places in registry order
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    /// Get a place by ID
    pub fn get(&self, id: &str) -> Option<&Place> {
        self.places.iter().find(|p| p.id == id)
    }

    /// Number that the next created place will use
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Get number of places
    pub fn len(&self) -> usize {
        self.places.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub(crate) fn place_mut(&mut self, index: usize) -> &mut Place {
        &mut self.places[index]
    }

    /// Hand out the next place ID and advance the counter
    pub(crate) fn allocate_id(&mut self) -> String {
        let id = format!("{}{}", ID_PREFIX, self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn push(&mut self, place: Place) {
        self.places.push(place);
    }
}
