//! Error types for label assembly.
//!
//! Only a handful of conditions abort a run; everything else is absorbed at the
//! component boundary and reported through the run log.

use std::path::PathBuf;

/// Result type alias for assembly operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while assembling label documents.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// PDF could not be loaded, read or written
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// The input directory holds no PDF documents
    #[error("No input documents found in {0}")]
    NoInputDocuments(PathBuf),

    /// The label selection rule matched none of the inputs
    #[error("No label document matched the selection rule: {0}")]
    NoLabelDocument(String),

    /// Every input other than the label is missing
    #[error("No code documents found besides the label")]
    NoCodeDocuments,

    /// Scanning the label produced no size page pairs
    #[error("No size pages found in label document {0}")]
    NoLabelPages(String),

    /// A document has no pages to copy
    #[error("Document has no pages: {0}")]
    EmptyDocument(String),

    /// Page index outside the document
    #[error("Page {page} out of range (document has {count} pages)")]
    PageOutOfRange {
        /// Requested 0-based page index
        page: usize,
        /// Number of pages in the document
        count: usize,
    },

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
