//! Error types for pdfoutline.

use std::io;
use thiserror::Error;

/// Result type alias for pdfoutline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting an outline.
///
/// Document-level variants are fatal for that document only; model variants
/// are fatal at process start since no document can use the inferential path.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// The PDF structure is corrupted or malformed.
    #[error("Corrupted PDF structure: {0}")]
    Corrupted(String),

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// The heading model artifact could not be read.
    #[error("Failed to load heading model: {0}")]
    ModelLoad(String),

    /// The heading model artifact is malformed or unsupported.
    #[error("Invalid heading model: {0}")]
    ModelFormat(String),

    /// Invalid pipeline configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Error during JSON rendering.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Whether this error means the input document itself could not be read.
    ///
    /// These failures are scoped to one document and never abort a batch.
    pub fn is_unreadable_document(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::UnknownFormat
                | Error::UnsupportedVersion(_)
                | Error::PdfParse(_)
                | Error::Encrypted
                | Error::Corrupted(_)
                | Error::TextExtract(_)
        )
    }

    /// Whether this error comes from the heading model artifact.
    pub fn is_model_failure(&self) -> bool {
        matches!(self, Error::ModelLoad(_) | Error::ModelFormat(_))
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
