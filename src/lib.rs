//! # pdfoutline
//!
//! Document title and heading outline extraction from PDF files.
//!
//! The library reads a PDF, decides which lines are headings and at what
//! level, and emits a compact JSON outline. Two evidence sources are used:
//! the author's own table of contents (bookmarks or a printed ToC page) and,
//! when none exists, layout features scored by a pre-trained gradient-boosted
//! tree classifier.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use pdfoutline::{extract_outline_file, render, GbdtModel, JsonFormat};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     // Load the heading model once
//!     let model = Arc::new(GbdtModel::load("model/heading_model.txt")?);
//!
//!     // Extract the outline
//!     let outline = extract_outline_file("document.pdf", model)?;
//!     println!("{}", render::to_json(&outline, JsonFormat::Pretty)?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Golden path**: bookmarks and printed tables of contents, with page
//!   label and front-matter offset resolution
//! - **Inferential path**: layout features, LightGBM model inference, level
//!   assignment from font sizes
//! - **Post-processing**: wrapped-heading stitching and a fail-open sanity
//!   filter
//! - **Batch processing**: per-document failure isolation, Rayon parallelism

pub mod batch;
pub mod detect;
pub mod error;
pub mod model;
pub mod outline;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use batch::{process_dir, BatchOptions, BatchReport};
pub use detect::{sniff_bytes, sniff_path, PdfHeader};
pub use error::{Error, Result};
pub use model::{
    HeadingLevel, Line, OutlineDocument, OutlineEntry, OutlineSource, RawDocument, TocEntry,
};
pub use outline::{
    extract_outline_bytes, extract_outline_file, Extraction, FeatureVector, GbdtModel,
    HeadingModel, OutlineConfig, OutlineExtractor,
};
pub use parser::{ErrorMode, ParseOptions, PdfParser};
pub use render::JsonFormat;

use std::path::Path;
use std::sync::Arc;

/// Read a PDF file into the raw per-page lines the pipeline consumes.
///
/// # Example
///
/// ```no_run
/// let raw = pdfoutline::read_file("document.pdf").unwrap();
/// println!("Pages: {}", raw.page_count());
/// ```
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<RawDocument> {
    let parser = PdfParser::open(path)?;
    parser.parse()
}

/// Read a PDF from bytes.
pub fn read_bytes(data: &[u8]) -> Result<RawDocument> {
    let parser = PdfParser::from_bytes(data)?;
    parser.parse()
}

/// Builder for configuring and running outline extraction.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use pdfoutline::{GbdtModel, JsonFormat, PdfOutline};
///
/// let model = Arc::new(GbdtModel::load("model/heading_model.txt")?);
/// let json = PdfOutline::new(model)
///     .without_bookmarks()
///     .strict()
///     .extract("document.pdf")?
///     .to_json(JsonFormat::Compact)?;
/// # Ok::<(), pdfoutline::Error>(())
/// ```
pub struct PdfOutline {
    model: Arc<dyn HeadingModel>,
    config: OutlineConfig,
    parse_options: ParseOptions,
}

impl PdfOutline {
    /// Create a builder around a heading model.
    pub fn new(model: Arc<dyn HeadingModel>) -> Self {
        Self {
            model,
            config: OutlineConfig::default(),
            parse_options: ParseOptions::default(),
        }
    }

    /// Replace the pipeline configuration.
    pub fn with_config(mut self, config: OutlineConfig) -> Self {
        self.config = config;
        self
    }

    /// Ignore the bookmark tree.
    pub fn without_bookmarks(mut self) -> Self {
        self.config = self.config.with_bookmarks(false);
        self.parse_options = self.parse_options.with_bookmarks(false);
        self
    }

    /// Ignore printed tables of contents.
    pub fn without_printed_toc(mut self) -> Self {
        self.config = self.config.with_printed_toc(false);
        self
    }

    /// Fail the document on the first undecodable page.
    pub fn strict(mut self) -> Self {
        self.parse_options = self.parse_options.strict();
        self
    }

    /// Read at most this many pages.
    pub fn with_max_pages(mut self, pages: u32) -> Self {
        self.parse_options = self.parse_options.with_max_pages(pages);
        self
    }

    /// Build the extractor.
    pub fn build(self) -> Result<OutlineExtractor> {
        Ok(OutlineExtractor::new(self.model, self.config)?.with_parse_options(self.parse_options))
    }

    /// Extract the outline of a PDF file.
    pub fn extract<P: AsRef<Path>>(self, path: P) -> Result<Extraction> {
        self.build()?.extract_file(path)
    }

    /// Extract the outline of a PDF held in memory.
    pub fn extract_bytes(self, data: &[u8]) -> Result<Extraction> {
        self.build()?.extract_bytes(data)
    }
}

impl Extraction {
    /// Render the outline document as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }
}
