//! PDF reading module.

mod backend;
mod layout;
mod options;
mod page_labels;
mod pdf_parser;

pub use backend::{
    decode_pdf_string, decode_text_simple, BackendFontInfo, ContentOp, LopdfBackend, PageId,
    PdfBackend, PdfValue, DEFAULT_PAGE_SIZE,
};
pub use layout::{
    group_spans_into_lines, interpret_content, simple_decoder, Column, LayoutAnalyzer, TextLine,
    TextSpan,
};
pub use options::{ErrorMode, ParseOptions};
pub use page_labels::{compute_labels, read_page_labels, to_roman, LabelRange, LabelStyle};
pub use pdf_parser::PdfParser;
