//! Error types for the strata structure reconstruction library.

use thiserror::Error;

/// Primary error type for structure reconstruction operations.
#[derive(Error, Debug)]
pub enum StructError {
    /// Invalid configuration, rejected before any document is processed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Two consecutive text blocks whose geometry matches none of the
    /// known paragraph-merge cases. Fails the offending document.
    #[error("unrecognized paragraph geometry on page {page}: {first:?} / {second:?}")]
    UnknownParagraphShape {
        page: usize,
        first: String,
        second: String,
    },

    /// The cell-extraction service returned more grids than there are
    /// detected table regions on the page.
    #[error("page {page}: {grids} cell grids for {regions} detected table regions")]
    GridMismatch {
        page: usize,
        grids: usize,
        regions: usize,
    },

    /// Processing was abandoned at a stage boundary.
    #[error("document processing cancelled")]
    Cancelled,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias for StructError.
pub type Result<T> = std::result::Result<T, StructError>;
