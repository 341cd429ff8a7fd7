//! Address normalization
//!
//! Turns free-text addresses into comparison keys: lower-cased, commas
//! dropped, whitespace collapsed and common street abbreviations expanded.

/// Expansion for an abbreviated token, if it is one.
///
/// Tokens are matched whole and after lower-casing.
fn expand_abbreviation(token: &str) -> Option<&'static str> {
    let expanded = match token {
        "r." => "rua",
        "av." => "avenida",
        "dr." => "doutor",
        "dra." => "doutora",
        "sr." => "senhor",
        "sra." => "senhora",
        "st." => "santo",
        "sta." => "santa",
        "vl." => "vila",
        "jd." => "jardim",
        "pr." => "praca",
        "pç." => "praca",
        "pq." => "parque",
        _ => return None,
    };
    Some(expanded)
}

/// Normalize a raw address into its comparison key
///
/// Empty or whitespace-only input yields an empty string.
pub fn normalize_address(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase().replace(',', "");

    lowered
        .split_whitespace()
        .map(|token| expand_abbreviation(token).unwrap_or(token))
        .collect::<Vec<_>>()
        .join(" ")
}
