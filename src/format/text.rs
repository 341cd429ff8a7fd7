//! Human-readable text output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::PlaceFormatter;
use crate::places::Place;

/// Text formatter - outputs an aligned table of places
pub struct TextFormatter;

impl PlaceFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable table"
    }

    fn format(&self, places: &[Place], config: &Config) -> Result<String> {
        if places.is_empty() {
            return Ok("No locations saved yet.\n".to_string());
        }

        let id_width = places.iter().map(|p| p.id.len()).max().unwrap_or(0).max(2);
        let mut output = String::new();

        output.push_str(&format!(
            "{:<id_width$}   {:>6}   {:<24}   {}\n",
            "ID", "VISITS", "COORDINATES", "ADDRESS"
        ));

        for place in places {
            output.push_str(&format!(
                "{:<id_width$}   {:>6}   {:<24}   {}\n",
                place.id,
                place.visit_count,
                place.centroid().to_string(),
                truncate(&place.canonical_address, config.display.address_width)
            ));
        }

        output.push_str(&format!("\nTotal locations: {}\n", places.len()));
        Ok(output)
    }
}

/// Shorten to `max_chars` characters, marking the cut with "..."
pub fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}
