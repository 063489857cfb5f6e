//! Raw reader output: what the PDF layer hands to the outline pipeline.

use serde::{Deserialize, Serialize};

/// One line of text as rendered on a page, before normalization.
///
/// Coordinates are top-down: `y0` is the top edge and grows downward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLine {
    /// Text content with inter-span spacing applied
    pub text: String,
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
    /// Dominant font size in points
    pub font_size: f32,
    /// Base font name of the first span (e.g., "ABCDEF+Arial-BoldMT")
    pub font_name: String,
    /// Whether the line is predominantly set in a bold face
    pub is_bold: bool,
}

impl RawLine {
    /// Create a line from its text, geometry and font.
    ///
    /// Boldness is derived from the font name.
    pub fn new(
        text: impl Into<String>,
        (x0, y0, x1, y1): (f32, f32, f32, f32),
        font_size: f32,
        font_name: impl Into<String>,
    ) -> Self {
        let font_name = font_name.into();
        let is_bold = is_bold_font_name(&font_name);
        Self {
            text: text.into(),
            x0,
            y0,
            x1,
            y1,
            font_size,
            font_name,
            is_bold,
        }
    }
}

/// A page of raw lines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPage {
    /// Physical page index (0-indexed)
    pub index: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Lines in reading order
    pub lines: Vec<RawLine>,
}

impl RawPage {
    /// Create an empty page.
    pub fn new(index: u32, width: f32, height: f32) -> Self {
        Self {
            index,
            width,
            height,
            lines: Vec::new(),
        }
    }

    /// Create an empty US Letter page.
    pub fn letter(index: u32) -> Self {
        Self::new(index, 612.0, 792.0)
    }

    /// Add a line to the page.
    pub fn push(&mut self, line: RawLine) {
        self.lines.push(line);
    }

    /// Builder-style variant of [`RawPage::push`].
    pub fn with_line(mut self, line: RawLine) -> Self {
        self.lines.push(line);
        self
    }
}

/// A document bookmark (`/Outlines` item) flattened in depth-first order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Nesting depth (0 = top level)
    pub depth: u8,
    /// Bookmark title
    pub title: String,
    /// Destination page (0-indexed), if it could be resolved
    pub page: Option<u32>,
}

/// Everything the outline pipeline needs from one PDF.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDocument {
    /// `/Title` from the document information dictionary
    pub title: Option<String>,
    /// Pages in physical order
    pub pages: Vec<RawPage>,
    /// Flattened bookmark tree
    pub bookmarks: Vec<Bookmark>,
    /// Printed page label per physical page (empty when the PDF has none)
    pub page_labels: Vec<String>,
}

impl RawDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Total number of raw lines across all pages.
    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|p| p.lines.len()).sum()
    }
}

/// Whether a font name denotes a bold face.
pub fn is_bold_font_name(font_name: &str) -> bool {
    let lower = font_name.to_lowercase();
    ["bold", "black", "heavy", "semibold", "demi"]
        .iter()
        .any(|marker| lower.contains(marker))
}
