//! Loads the optional `--doc-cfg` file: a flat JSON object of string
//! key/value pairs consumed wholesale as the template substitution set.
//!
//! This is the only place untrusted document config is parsed; failures
//! surface as context-rich errors at the CLI boundary.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use docpub_core::template::DocConfig;
use tracing::info;

/// Reads and parses the document config, or returns an empty set when no
/// path was given.
pub fn load_doc_config(path: Option<&Path>) -> Result<DocConfig> {
    let Some(path) = path else {
        return Ok(DocConfig::new());
    };

    info!(config_path = ?path, "Loading document config");
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read document config {}", path.display()))?;
    let config: DocConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse document config {}", path.display()))?;
    info!(config_path = ?path, entries = config.len(), "Parsed document config");
    Ok(config)
}
