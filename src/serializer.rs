//! Serialization of RAML documents to RAML (YAML) or JSON text.

use crate::raml::Document;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// First line of every RAML 1.0 document
pub const RAML_HEADER: &str = "#%RAML 1.0";

/// Serializes a document to RAML: the version header followed by the YAML body.
///
/// # Errors
///
/// Returns an error if YAML serialization fails.
pub fn serialize_raml(doc: &Document) -> Result<String> {
    debug!("Serializing RAML document to YAML");
    let body = serde_yaml::to_string(doc).context("Failed to serialize RAML document to YAML")?;
    Ok(format!("{}\n{}", RAML_HEADER, body))
}

/// Serializes a document to pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(doc: &Document) -> Result<String> {
    debug!("Serializing RAML document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize RAML document to JSON")
}

/// Writes `content` to `path`, creating parent directories and overwriting the file.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
