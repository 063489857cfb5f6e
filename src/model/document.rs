//! Outline-level types: the pipeline's intermediate records and its output.

use super::Line;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Heading hierarchy depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Top-level heading
    H1,
    /// Section heading
    H2,
    /// Subsection heading
    H3,
}

impl HeadingLevel {
    /// All levels, largest first.
    pub const ALL: [HeadingLevel; 3] = [HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3];

    /// Map a 1-based depth to a level, capping anything deeper than 3 at H3.
    pub fn from_depth(depth: u8) -> Self {
        match depth {
            0 | 1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }

    /// 1-based depth of this level.
    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.depth())
    }
}

/// One entry parsed from a table of contents or bookmark tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// 1-based depth
    pub level: u8,
    /// Entry title
    pub title: String,
    /// Physical target page (0-indexed)
    pub page: u32,
}

impl TocEntry {
    pub fn new(level: u8, title: impl Into<String>, page: u32) -> Self {
        Self {
            level: level.max(1),
            title: title.into(),
            page,
        }
    }
}

/// A line accepted by the heading classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingCandidate {
    /// Originating line (or the concatenation of stitched lines)
    pub line: Line,
    /// Heading probability in [0, 1]
    pub score: f32,
    /// Level assigned from the document's font-size distribution
    pub level: HeadingLevel,
    /// Position of the originating line in document order
    pub order: usize,
}

/// One heading in the final outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
}

impl OutlineEntry {
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// The extracted title and outline of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineDocument {
    /// Document title
    pub title: String,
    /// Headings in document order
    pub outline: Vec<OutlineEntry>,
}

impl OutlineDocument {
    /// Create a document with a title and no headings.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            outline: Vec::new(),
        }
    }

    /// Append a heading.
    pub fn push(&mut self, entry: OutlineEntry) {
        self.outline.push(entry);
    }

    /// Whether the outline has no headings.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    /// Number of headings at the given level.
    pub fn count_level(&self, level: HeadingLevel) -> usize {
        self.outline.iter().filter(|e| e.level == level).count()
    }
}

/// Which evidence produced an outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlineSource {
    /// The PDF's `/Outlines` bookmark tree
    Bookmarks,
    /// A printed table of contents page
    TableOfContents,
    /// Layout features and the heading classifier
    Inferred,
    /// The document had no extractable text
    Empty,
}

impl fmt::Display for OutlineSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutlineSource::Bookmarks => "bookmarks",
            OutlineSource::TableOfContents => "table of contents",
            OutlineSource::Inferred => "inferred",
            OutlineSource::Empty => "empty",
        };
        f.write_str(name)
    }
}
