//! JSON rendering for outline documents.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::OutlineDocument;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline document to JSON.
pub fn to_json(doc: &OutlineDocument, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Write an outline document as JSON, replacing any existing file.
pub fn write_json<P: AsRef<Path>>(doc: &OutlineDocument, path: P, format: JsonFormat) -> Result<()> {
    let mut json = to_json(doc, format)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}
