//! Storage encoding for reason collections
//!
//! Reasons and reason codes are stored as JSON arrays in text columns, so any
//! character (including `,`) may appear inside a value.

/// Stored form of an empty collection
pub const EMPTY_REASONS: &str = "[]";

pub fn encode_reasons(values: &[String]) -> serde_json::Result<String> {
    serde_json::to_string(values)
}

/// NULL and blank columns decode to an empty list
pub fn decode_reasons(stored: Option<&str>) -> serde_json::Result<Vec<String>> {
    match stored.map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(s) => serde_json::from_str(s),
    }
}
