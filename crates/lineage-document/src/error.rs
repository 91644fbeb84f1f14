//! Error types for document loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a document
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The referenced file does not exist
    #[error("Document not found: {}", path.display())]
    Missing {
        /// Path that was requested
        path: PathBuf,
    },

    /// The file exists but could not be read or decoded
    #[error("Failed to parse {}: {reason}", path.display())]
    Parse {
        /// Path that failed
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// An encoding label in the fallback chain is not recognized
    #[error("Unknown encoding label: {0}")]
    UnknownEncoding(String),
}

impl DocumentError {
    /// Whether this error means the source file is simply absent
    pub fn is_missing(&self) -> bool {
        matches!(self, DocumentError::Missing { .. })
    }
}
