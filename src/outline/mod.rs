//! Outline extraction pipeline.
//!
//! The extractor tries the golden path first (bookmarks, then a printed
//! table of contents) and falls back to inference from layout features:
//!
//! ```text
//! RawDocument -> lines -> bookmarks | printed ToC
//!                      -> features -> classifier -> levels -> stitch -> sanity
//!                      -> title + outline
//! ```

mod assemble;
mod classifier;
mod config;
mod features;
mod gbdt;
mod levels;
mod lines;
mod patterns;
mod sanity;
mod stitch;
mod toc;

pub use assemble::{outline_from_candidates, outline_from_toc, select_title};
pub use classifier::{classify, HeadingModel};
pub use config::OutlineConfig;
pub use features::{FeatureExtractor, FeatureVector, UNKNOWN_FAMILY};
pub use gbdt::GbdtModel;
pub use levels::{assign_levels, level_for_size, size_buckets};
pub use lines::{build_lines, font_family, normalize_text, page_lines};
pub use patterns::Patterns;
pub use sanity::{Rejection, SanityFilter};
pub use stitch::stitch;
pub use toc::{clamp_hierarchy, entries_from_bookmarks, TocParser};

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::model::{Line, OutlineDocument, OutlineEntry, OutlineSource, RawDocument, TocEntry};
use crate::parser::{ParseOptions, PdfParser};

/// Result of running the pipeline on one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// The outline document written as JSON
    pub document: OutlineDocument,
    /// Which path produced the outline
    pub source: OutlineSource,
}

/// Runs the outline pipeline with a shared heading model.
///
/// One extractor can process any number of documents, from any number of
/// threads; each call owns its intermediate state.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use pdfoutline::outline::{GbdtModel, OutlineConfig, OutlineExtractor};
///
/// let model = Arc::new(GbdtModel::load("model/heading_model.txt")?);
/// let extractor = OutlineExtractor::new(model, OutlineConfig::default())?;
/// let extraction = extractor.extract_file("report.pdf")?;
/// println!("{} ({})", extraction.document.title, extraction.source);
/// # Ok::<(), pdfoutline::Error>(())
/// ```
#[derive(Clone)]
pub struct OutlineExtractor {
    model: Arc<dyn HeadingModel>,
    config: OutlineConfig,
    patterns: Arc<Patterns>,
    parse_options: ParseOptions,
}

impl OutlineExtractor {
    /// Create an extractor; fails when the configuration is invalid.
    pub fn new(model: Arc<dyn HeadingModel>, config: OutlineConfig) -> Result<Self> {
        config.validate()?;
        let parse_options = ParseOptions::default()
            .with_bookmarks(config.use_bookmarks)
            .with_page_labels(config.use_printed_toc);
        Ok(Self {
            model,
            config,
            patterns: Arc::new(Patterns::new()?),
            parse_options,
        })
    }

    /// Replace the reader options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    pub fn parse_options(&self) -> &ParseOptions {
        &self.parse_options
    }

    /// Read a PDF file and extract its outline.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<Extraction> {
        let path = path.as_ref();
        let parser = PdfParser::open_with_options(path, self.parse_options.clone())?;
        let raw = parser.parse()?;
        log::debug!("Read {} pages from {}", raw.page_count(), path.display());
        Ok(self.extract_raw(&raw))
    }

    /// Read a PDF from memory and extract its outline.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<Extraction> {
        let parser = PdfParser::from_bytes_with_options(data, self.parse_options.clone())?;
        let raw = parser.parse()?;
        Ok(self.extract_raw(&raw))
    }

    /// Extract the outline of an already-read document.
    ///
    /// Never fails: a document without text yields an empty outline.
    pub fn extract_raw(&self, doc: &RawDocument) -> Extraction {
        let lines = build_lines(doc, &self.config);

        if let Some((entries, source)) = self.golden_entries(doc, &lines) {
            log::info!("Using {} ({} entries)", source, entries.len());
            let title = select_title(doc, &lines, &HashSet::new(), &self.config);
            return Extraction {
                document: OutlineDocument {
                    title,
                    outline: outline_from_toc(&entries),
                },
                source,
            };
        }

        if lines.is_empty() {
            log::info!("No extractable text; emitting an empty outline");
            return Extraction {
                document: OutlineDocument {
                    title: select_title(doc, &lines, &HashSet::new(), &self.config),
                    outline: Vec::new(),
                },
                source: OutlineSource::Empty,
            };
        }

        let (title, outline) = self.infer(doc, &lines);
        log::info!("Inferred {} headings from {} lines", outline.len(), lines.len());
        Extraction {
            document: OutlineDocument { title, outline },
            source: OutlineSource::Inferred,
        }
    }

    fn golden_entries(
        &self,
        doc: &RawDocument,
        lines: &[Line],
    ) -> Option<(Vec<TocEntry>, OutlineSource)> {
        if self.config.use_bookmarks {
            let entries = entries_from_bookmarks(&doc.bookmarks, &self.config);
            if !entries.is_empty() {
                return Some((entries, OutlineSource::Bookmarks));
            }
            if !doc.bookmarks.is_empty() {
                log::debug!(
                    "Ignoring bookmark tree with {} usable entries",
                    doc.bookmarks.iter().filter(|b| b.page.is_some()).count()
                );
            }
        }

        if self.config.use_printed_toc && !lines.is_empty() {
            let parser = TocParser::new(&self.config, &self.patterns);
            let entries = parser.parse(lines, doc.page_count(), &doc.page_labels);
            if !entries.is_empty() {
                return Some((entries, OutlineSource::TableOfContents));
            }
        }

        None
    }

    fn infer(&self, doc: &RawDocument, lines: &[Line]) -> (String, Vec<OutlineEntry>) {
        let extractor = FeatureExtractor::fit(lines, &self.patterns);
        let mut candidates = classify(
            lines,
            &extractor,
            self.model.as_ref(),
            self.config.decision_threshold,
        );
        log::debug!("Classifier accepted {} of {} lines", candidates.len(), lines.len());

        let headings: HashSet<usize> = candidates.iter().map(|c| c.order).collect();

        assign_levels(&mut candidates, self.config.size_tolerance);
        let stitched = stitch(candidates, &self.config);
        let kept = SanityFilter::new(&self.config, &self.patterns).filter(stitched);

        let title = select_title(doc, lines, &headings, &self.config);
        (title, outline_from_candidates(&kept))
    }
}

impl std::fmt::Debug for OutlineExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineExtractor")
            .field("config", &self.config)
            .field("parse_options", &self.parse_options)
            .finish_non_exhaustive()
    }
}

/// Extract an outline from a PDF file with the default configuration.
pub fn extract_outline_file<P: AsRef<Path>>(
    path: P,
    model: Arc<dyn HeadingModel>,
) -> Result<OutlineDocument> {
    let extractor = OutlineExtractor::new(model, OutlineConfig::default())?;
    Ok(extractor.extract_file(path)?.document)
}

/// Extract an outline from PDF bytes with the default configuration.
pub fn extract_outline_bytes(data: &[u8], model: Arc<dyn HeadingModel>) -> Result<OutlineDocument> {
    let extractor = OutlineExtractor::new(model, OutlineConfig::default())?;
    Ok(extractor.extract_bytes(data)?.document)
}
