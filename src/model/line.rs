//! Normalized per-line records.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in top-down page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    /// Create a bounding box from its edges.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Horizontal midpoint.
    pub fn mid_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// One rendered text line with its layout signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Normalized text
    pub text: String,
    /// Physical page index (0-indexed)
    pub page: u32,
    /// Font size in points
    pub font_size: f32,
    /// Whether the line is set in a bold face
    pub is_bold: bool,
    /// Font family (e.g., "Arial"); empty when unknown
    pub font_family: String,
    /// Bounding box
    pub bbox: BBox,
    /// Whether the line is horizontally centered on the page
    pub is_centered: bool,
    /// Left offset from the page's leftmost line
    pub indentation: f32,
}

impl Line {
    /// Whether two lines share font size (within `tolerance`), family and weight.
    pub fn same_style(&self, other: &Line, tolerance: f32) -> bool {
        (self.font_size - other.font_size).abs() <= tolerance
            && self.font_family == other.font_family
            && self.is_bold == other.is_bold
    }
}
