//! pcp_summary
//!
//! Summarize per-site cell-quality tables from the pooled cell painting
//! preprocessing pipeline: load and concatenate the per-site cell counts,
//! derive the category/site/well orderings, compute the roll-up tables, and
//! build the renderer-ready chart payloads.

pub mod aggregate;
pub mod load;
pub mod rollup;
pub mod websummary;

use serde::Serialize;

/// Assert that two JSON values are equal
pub fn check_eq_json(j1: &str, j2: &str) {
    pretty_assertions::assert_eq!(
        serde_json::from_str::<serde_json::value::Value>(j1).unwrap(),
        serde_json::from_str::<serde_json::value::Value>(j2).unwrap()
    );
}

/// Test JSON round trip
pub fn test_json_roundtrip<T: Serialize + serde::de::DeserializeOwned>(json: &str) -> T {
    let parsed: T = serde_json::from_str(json).unwrap();
    let parsed_str = serde_json::to_string(&parsed).unwrap();
    check_eq_json(&parsed_str, json);
    parsed
}
