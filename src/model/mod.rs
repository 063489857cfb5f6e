//! Document model types for outline extraction.
//!
//! This module defines the intermediate representation that bridges PDF
//! reading and outline assembly: raw per-page lines from the reader,
//! normalized lines, heading candidates, and the final outline document.

mod document;
mod line;
mod raw;

pub use document::{
    HeadingCandidate, HeadingLevel, OutlineDocument, OutlineEntry, OutlineSource, TocEntry,
};
pub use line::{BBox, Line};
pub use raw::{is_bold_font_name, Bookmark, RawDocument, RawLine, RawPage};
