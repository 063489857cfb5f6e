//! Reader options.

/// Options for reading PDF documents.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode for per-page failures
    pub error_mode: ErrorMode,

    /// Read at most this many pages (None = all)
    pub max_pages: Option<u32>,

    /// Whether to read the `/Outlines` bookmark tree
    pub read_bookmarks: bool,

    /// Whether to read `/PageLabels`
    pub read_page_labels: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip pages whose content cannot be decoded).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable strict mode (fail the document on the first bad page).
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Limit the number of pages read.
    pub fn with_max_pages(mut self, pages: u32) -> Self {
        self.max_pages = Some(pages);
        self
    }

    /// Enable or disable bookmark extraction.
    pub fn with_bookmarks(mut self, read: bool) -> Self {
        self.read_bookmarks = read;
        self
    }

    /// Enable or disable page label extraction.
    pub fn with_page_labels(mut self, read: bool) -> Self {
        self.read_page_labels = read;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            max_pages: None,
            read_bookmarks: true,
            read_page_labels: true,
        }
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any page error
    Strict,
    /// Skip pages that cannot be decoded and continue
    #[default]
    Lenient,
}
