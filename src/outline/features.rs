//! Per-line layout features for the heading classifier.

use crate::model::Line;

use super::patterns::Patterns;

/// Category used for an empty or unseen font family.
pub const UNKNOWN_FAMILY: f32 = -1.0;

/// Fixed-order feature vector; field order is the model's column order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub font_size: f32,
    /// 1.0 when the text starts with section numbering
    pub pattern_match: f32,
    pub is_bold: f32,
    pub is_centered: f32,
    pub indentation: f32,
    /// Index of the family in the document's sorted family list, or -1
    pub font_family: f32,
}

impl FeatureVector {
    /// Number of features.
    pub const LEN: usize = 6;

    /// Column names in model order.
    pub const NAMES: [&'static str; Self::LEN] = [
        "size",
        "pattern_match",
        "bold",
        "is_centered",
        "indentation",
        "font_family_encoded",
    ];

    /// Values in model column order.
    pub fn to_array(&self) -> [f32; Self::LEN] {
        [
            self.font_size,
            self.pattern_match,
            self.is_bold,
            self.is_centered,
            self.indentation,
            self.font_family,
        ]
    }
}

/// Computes feature vectors for the lines of one document.
#[derive(Debug, Clone)]
pub struct FeatureExtractor<'a> {
    patterns: &'a Patterns,
    families: Vec<String>,
}

impl<'a> FeatureExtractor<'a> {
    /// Build the family encoding from every line of the document.
    pub fn fit(lines: &[Line], patterns: &'a Patterns) -> Self {
        let mut families: Vec<String> = lines
            .iter()
            .filter(|line| !line.font_family.is_empty())
            .map(|line| line.font_family.clone())
            .collect();
        families.sort();
        families.dedup();
        Self { patterns, families }
    }

    /// Distinct font families, sorted.
    pub fn families(&self) -> &[String] {
        &self.families
    }

    /// Encoded family category.
    pub fn encode_family(&self, family: &str) -> f32 {
        if family.is_empty() {
            return UNKNOWN_FAMILY;
        }
        self.families
            .binary_search_by(|f| f.as_str().cmp(family))
            .map(|i| i as f32)
            .unwrap_or(UNKNOWN_FAMILY)
    }

    /// Features of one line.
    pub fn extract(&self, line: &Line) -> FeatureVector {
        FeatureVector {
            font_size: line.font_size,
            pattern_match: flag(self.patterns.starts_with_numbering(&line.text)),
            is_bold: flag(line.is_bold),
            is_centered: flag(line.is_centered),
            indentation: line.indentation,
            font_family: self.encode_family(&line.font_family),
        }
    }

    /// Features of every line, in order.
    pub fn extract_all(&self, lines: &[Line]) -> Vec<FeatureVector> {
        lines.iter().map(|line| self.extract(line)).collect()
    }
}

fn flag(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}
