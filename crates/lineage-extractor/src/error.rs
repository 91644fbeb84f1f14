//! Error types for the Extractor

use lineage_document::DocumentError;
use thiserror::Error;

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractorError>;

/// Errors that can occur during extraction
///
/// Only conditions that abort a whole report surface here. Missing files,
/// missing sections, unresolved links and metric cycles are recorded as
/// [`Diagnostic`](crate::Diagnostic)s instead.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// A document could not be read or decoded
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No locale table for the requested code
    #[error("Unknown locale: {0}")]
    UnknownLocale(String),

    /// No report matched the request
    #[error("Report not found: {0}")]
    ReportNotFound(String),

    /// A worker task failed outside of extraction
    #[error("Worker error: {0}")]
    Worker(String),
}
