//! Lineage Document Layer
//!
//! Loading, caching and navigating the HTML pages written by the BI
//! platform's documentation exporter.
//!
//! ## Overview
//!
//! - [`EncodingChain`] decodes bytes with the first encoding that accepts
//!   them strictly, falling back to lossy UTF-8
//! - [`DocumentStore`] reads a file and parses it into a [`DocumentTree`]
//! - [`ParseCache`] memoizes trees by absolute path and is shared across
//!   worker threads
//! - [`SectionLocator`] finds the subtree bounding a single object
//!
//! ## Example Usage
//!
//! ```no_run
//! use lineage_document::{ParseCache, SectionKey, SectionLocator};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = ParseCache::default();
//! let doc = cache.get_or_parse(Path::new("/corpus/Metric.html"))?;
//!
//! if let Some(section) = SectionLocator::default()
//!     .locate(&doc, SectionKey::anchor("8D679D3711D3E4981000E787EC6DE8A4"))
//! {
//!     println!("{}", doc.text(section.root));
//! }
//! println!("{}", cache.stats().summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod cache;
mod encoding;
mod error;
mod section;
mod store;
mod tree;

pub use cache::{CacheStats, ParseCache};
pub use encoding::{Decoded, EncodingChain, DEFAULT_ENCODINGS};
pub use error::DocumentError;
pub use section::{LocateStrategy, Section, SectionKey, SectionLocator, DEFAULT_OBJECT_MARKER};
pub use store::DocumentStore;
pub use tree::{DocumentTree, ElementData, NodeData, NodeId};
