//! Output formatters
//!
//! Provides trait-based output formatting for place listings.

pub mod json;
pub mod text;

use crate::config::Config;
use crate::error::Result;
use crate::places::Place;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Trait for output formatters
pub trait PlaceFormatter {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a list of places
    ///
    /// # Arguments
    /// * `places` - Places in registry order
    /// * `config` - Application config (column widths, etc.)
    fn format(&self, places: &[Place], config: &Config) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn PlaceFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    vec![
        FormatInfo {
            name: "json".to_string(),
            description: "Places as a JSON array".to_string(),
        },
        FormatInfo {
            name: "text".to_string(),
            description: "Human-readable table".to_string(),
        },
    ]
}
