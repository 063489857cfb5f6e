//! Directory batch processing.
//!
//! Every PDF in the input directory is extracted independently and written to
//! `<output>/<stem>.json`. A document that cannot be read is logged and
//! reported; it never stops the rest of the batch.

use std::fs;
use std::path::{Path, PathBuf};

use crossbeam_channel::Sender;
use rayon::prelude::*;

use crate::detect::has_pdf_extension;
use crate::error::Result;
use crate::model::OutlineSource;
use crate::outline::OutlineExtractor;
use crate::render::{write_json, JsonFormat};

/// Options for a batch run.
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// Process documents on the rayon thread pool
    pub parallel: bool,
    /// Output JSON format
    pub format: JsonFormat,
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one document at a time.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            format: JsonFormat::Pretty,
        }
    }
}

/// A document that was extracted and written.
#[derive(Debug, Clone, PartialEq)]
pub struct Processed {
    pub input: PathBuf,
    pub output: PathBuf,
    pub source: OutlineSource,
    pub headings: usize,
}

/// A document that failed.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub input: PathBuf,
    pub error: String,
}

/// Progress notification sent as each document finishes.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    Done(Processed),
    Failed(Failure),
}

/// Outcome of a batch run, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub processed: Vec<Processed>,
    pub failed: Vec<Failure>,
}

impl BatchReport {
    /// Number of documents attempted.
    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }

    /// Whether every document succeeded.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of documents whose outline came from the given source.
    pub fn count_source(&self, source: OutlineSource) -> usize {
        self.processed.iter().filter(|p| p.source == source).count()
    }
}

/// PDF files directly inside `dir`, sorted by path.
pub fn discover_pdfs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_pdf_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Output path for an input document.
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    output_dir.join(format!("{}.json", stem))
}

/// Extract every PDF in `input_dir` into `output_dir`.
pub fn process_dir<P: AsRef<Path>, Q: AsRef<Path>>(
    extractor: &OutlineExtractor,
    input_dir: P,
    output_dir: Q,
    options: BatchOptions,
) -> Result<BatchReport> {
    let files = discover_pdfs(input_dir)?;
    process_files(extractor, &files, output_dir.as_ref(), options, None)
}

/// Extract the given files into `output_dir`.
///
/// When `events` is set, one event is sent per document as it finishes.
/// Fails only when the output directory cannot be created.
pub fn process_files(
    extractor: &OutlineExtractor,
    files: &[PathBuf],
    output_dir: &Path,
    options: BatchOptions,
    events: Option<Sender<BatchEvent>>,
) -> Result<BatchReport> {
    fs::create_dir_all(output_dir)?;
    log::info!(
        "Processing {} documents into {} ({})",
        files.len(),
        output_dir.display(),
        if options.parallel { "parallel" } else { "sequential" }
    );

    let run = |input: &PathBuf| {
        let event = match process_one(extractor, input, output_dir, options.format) {
            Ok(processed) => BatchEvent::Done(processed),
            Err(e) => {
                log::warn!("Failed to process {}: {}", input.display(), e);
                BatchEvent::Failed(Failure {
                    input: input.clone(),
                    error: e.to_string(),
                })
            }
        };
        if let Some(tx) = &events {
            if tx.send(event.clone()).is_err() {
                log::debug!("Progress receiver dropped");
            }
        }
        event
    };

    let outcomes: Vec<BatchEvent> = if options.parallel {
        files.par_iter().map(run).collect()
    } else {
        files.iter().map(run).collect()
    };

    let mut report = BatchReport::default();
    for outcome in outcomes {
        match outcome {
            BatchEvent::Done(p) => report.processed.push(p),
            BatchEvent::Failed(f) => report.failed.push(f),
        }
    }
    Ok(report)
}

fn process_one(
    extractor: &OutlineExtractor,
    input: &Path,
    output_dir: &Path,
    format: JsonFormat,
) -> Result<Processed> {
    let extraction = extractor.extract_file(input)?;
    let output = output_path(input, output_dir);
    write_json(&extraction.document, &output, format)?;
    log::debug!(
        "{} -> {} ({}, {} headings)",
        input.display(),
        output.display(),
        extraction.source,
        extraction.document.outline.len()
    );
    Ok(Processed {
        input: input.to_path_buf(),
        output,
        source: extraction.source,
        headings: extraction.document.outline.len(),
    })
}
