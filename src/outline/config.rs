//! Tunable thresholds for outline extraction.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Every threshold the outline pipeline uses.
///
/// Deserializes from JSON with all fields optional; missing fields take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    // Line model
    /// Max distance of a line's midpoint from the page midpoint, as a
    /// fraction of page width, for the line to count as centered
    pub centered_tolerance: f32,

    // Golden path
    /// Use `/Outlines` bookmarks when present
    pub use_bookmarks: bool,
    /// Look for a printed table of contents
    pub use_printed_toc: bool,
    /// Upper bound on pages scanned for a table of contents
    pub toc_max_scan_pages: u32,
    /// Headings that mark a table of contents page (matched case-insensitively)
    pub toc_keywords: Vec<String>,
    /// Fraction of a page's lines that must look like entries
    pub toc_min_density: f32,
    /// Fewer entries than this is not a usable table of contents
    pub min_toc_entries: usize,
    /// Max consecutive pages a table of contents may span
    pub toc_max_pages: u32,
    /// Entries cross-checked against page content to find the page offset
    pub offset_probe_entries: usize,
    /// Largest forward printed-to-physical page offset considered
    pub max_page_offset: i32,
    /// Indentations within this many points share a level
    pub indent_cluster_tolerance: f32,

    // Classifier
    /// Minimum heading probability
    pub decision_threshold: f32,
    /// Font sizes within this many points are the same size
    pub size_tolerance: f32,

    // Stitcher
    /// Max vertical gap between fragments, as a multiple of font size
    pub stitch_gap_ratio: f32,

    // Sanity filter
    /// Min share of letters among non-whitespace characters
    pub min_alpha_ratio: f32,
    pub min_heading_chars: usize,
    pub max_heading_chars: usize,
    pub max_heading_words: usize,

    // Title
    /// Title lines must start within this top fraction of page 0
    pub title_top_fraction: f32,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            centered_tolerance: 0.05,
            use_bookmarks: true,
            use_printed_toc: true,
            toc_max_scan_pages: 10,
            toc_keywords: [
                "table of contents",
                "contents",
                "toc",
                "outline",
                "document map",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            toc_min_density: 0.5,
            min_toc_entries: 3,
            toc_max_pages: 5,
            offset_probe_entries: 8,
            max_page_offset: 40,
            indent_cluster_tolerance: 4.0,
            decision_threshold: 0.5,
            size_tolerance: 0.5,
            stitch_gap_ratio: 0.8,
            min_alpha_ratio: 0.5,
            min_heading_chars: 2,
            max_heading_chars: 200,
            max_heading_words: 25,
            title_top_fraction: 0.5,
        }
    }
}

impl OutlineConfig {
    /// Create a configuration with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Enable or disable the bookmark golden path.
    pub fn with_bookmarks(mut self, enabled: bool) -> Self {
        self.use_bookmarks = enabled;
        self
    }

    /// Enable or disable printed table-of-contents detection.
    pub fn with_printed_toc(mut self, enabled: bool) -> Self {
        self.use_printed_toc = enabled;
        self
    }

    /// Set the classifier decision threshold.
    pub fn with_decision_threshold(mut self, threshold: f32) -> Self {
        self.decision_threshold = threshold;
        self
    }

    /// Set the minimum number of entries for a usable table of contents.
    pub fn with_min_toc_entries(mut self, entries: usize) -> Self {
        self.min_toc_entries = entries;
        self
    }

    /// Set the font size tolerance.
    pub fn with_size_tolerance(mut self, tolerance: f32) -> Self {
        self.size_tolerance = tolerance;
        self
    }

    /// Set the stitcher's vertical gap ratio.
    pub fn with_stitch_gap_ratio(mut self, ratio: f32) -> Self {
        self.stitch_gap_ratio = ratio;
        self
    }

    /// Set the table-of-contents keywords.
    pub fn with_toc_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.toc_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Check that every threshold is in range.
    pub fn validate(&self) -> Result<()> {
        fn fraction(name: &str, value: f32) -> Result<()> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(Error::Config(format!("{} must be in [0, 1], got {}", name, value)))
            }
        }

        fraction("centered_tolerance", self.centered_tolerance)?;
        fraction("toc_min_density", self.toc_min_density)?;
        fraction("decision_threshold", self.decision_threshold)?;
        fraction("min_alpha_ratio", self.min_alpha_ratio)?;
        fraction("title_top_fraction", self.title_top_fraction)?;

        if self.size_tolerance < 0.0 || self.indent_cluster_tolerance < 0.0 {
            return Err(Error::Config("tolerances must be non-negative".to_string()));
        }
        if self.stitch_gap_ratio < 0.0 {
            return Err(Error::Config("stitch_gap_ratio must be non-negative".to_string()));
        }
        if self.min_toc_entries == 0 {
            return Err(Error::Config("min_toc_entries must be at least 1".to_string()));
        }
        if self.min_heading_chars > self.max_heading_chars {
            return Err(Error::Config(format!(
                "min_heading_chars ({}) exceeds max_heading_chars ({})",
                self.min_heading_chars, self.max_heading_chars
            )));
        }
        if self.max_page_offset < 0 {
            return Err(Error::Config("max_page_offset must be non-negative".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = OutlineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_toc_entries, 3);
        assert_eq!(config.toc_keywords.len(), 5);
    }

    #[test]
    fn test_partial_json() {
        let config =
            OutlineConfig::from_json(r#"{ "decision_threshold": 0.7, "use_bookmarks": false }"#)
                .unwrap();
        assert_eq!(config.decision_threshold, 0.7);
        assert!(!config.use_bookmarks);
        assert_eq!(config.stitch_gap_ratio, 0.8);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = OutlineConfig::from_json(r#"{ "decision_threshold": 1.5 }"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = OutlineConfig::from_json(r#"{ "min_toc_entries": "three" }"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let config = OutlineConfig::new().with_min_toc_entries(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builders() {
        let config = OutlineConfig::new()
            .with_bookmarks(false)
            .with_printed_toc(false)
            .with_toc_keywords(["Inhalt"]);
        assert!(!config.use_bookmarks);
        assert!(!config.use_printed_toc);
        assert_eq!(config.toc_keywords, vec!["Inhalt".to_string()]);
    }
}
