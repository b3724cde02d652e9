//! Example queries and output shape, embedded at compile time.

use serde::{Deserialize, Serialize};

/// The embedded sample TOML.
static SAMPLE_TOML: &str = include_str!("sample.toml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    pub example_queries: Vec<String>,
    pub output_format: serde_json::Value,
}

/// Load the embedded sample.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed. The file ships with the
/// crate, so a successful test run proves it parses.
pub fn load_sample() -> Sample {
    toml::from_str(SAMPLE_TOML).expect("embedded sample.toml is invalid")
}
