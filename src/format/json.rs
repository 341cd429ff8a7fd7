//! JSON output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::PlaceFormatter;
use crate::places::Place;

/// JSON formatter - outputs places as a pretty-printed array
pub struct JsonFormatter;

impl PlaceFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Places as a JSON array"
    }

    fn format(&self, places: &[Place], _config: &Config) -> Result<String> {
        let mut output = serde_json::to_string_pretty(places)?;
        output.push('\n');
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_place() -> Place {
        let seen = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        Place {
            id: "loc-1".to_string(),
            canonical_address: "123 test street".to_string(),
            address_variants: vec!["124 test street".to_string()],
            avg_lat: 41.4089,
            avg_lon: -75.6624,
            visit_count: 3,
            first_seen: seen,
            last_seen: seen,
        }
    }

    #[test]
    fn test_json_format() {
        let output = JsonFormatter
            .format(&[sample_place()], &Config::default())
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        let first = &parsed.as_array().unwrap()[0];
        assert_eq!(first["id"], "loc-1");
        assert_eq!(first["canonicalAddress"], "123 test street");
        assert_eq!(first["visitCount"], 3);
        assert!(output.ends_with("]\n"));
    }

    #[test]
    fn test_json_empty() {
        let output = JsonFormatter.format(&[], &Config::default()).unwrap();
        assert_eq!(output, "[]\n");
    }

    #[test]
    fn test_json_formatter_info() {
        assert_eq!(JsonFormatter.name(), "json");
        assert!(!JsonFormatter.description().is_empty());
    }
}
