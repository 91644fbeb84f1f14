//! Document store - reads and parses documents from disk

use crate::{DocumentError, DocumentTree, EncodingChain};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Loads documents from disk through an encoding fallback chain
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    chain: EncodingChain,
}

impl DocumentStore {
    /// Create a store with the given encoding chain
    pub fn new(chain: EncodingChain) -> Self {
        Self { chain }
    }

    /// The encoding chain in use
    pub fn chain(&self) -> &EncodingChain {
        &self.chain
    }

    /// Read and parse a document
    ///
    /// A file that does not exist yields [`DocumentError::Missing`]; any other
    /// read failure is a [`DocumentError::Parse`].
    pub fn parse(&self, path: &Path) -> Result<DocumentTree, DocumentError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DocumentError::Missing {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => {
                return Err(DocumentError::Parse {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        };

        let doc = self.parse_bytes(&bytes);
        debug!(
            "Parsed {} ({} bytes, {} nodes, {})",
            path.display(),
            bytes.len(),
            doc.len(),
            doc.encoding()
        );
        Ok(doc)
    }

    /// Parse an in-memory byte stream
    pub fn parse_bytes(&self, bytes: &[u8]) -> DocumentTree {
        let decoded = self.chain.decode(bytes);
        if decoded.lossy {
            warn!("No encoding in the chain decoded cleanly; using lossy UTF-8");
        }
        DocumentTree::from_html(&decoded.text).with_encoding(decoded.encoding)
    }
}
