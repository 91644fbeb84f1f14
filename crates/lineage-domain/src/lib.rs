//! Lineage Domain Layer
//!
//! This crate holds the typed entity graph reconstructed from a BI platform's
//! documentation export. It has no knowledge of documents, encodings or HTML;
//! those concerns live in `lineage-document` and `lineage-extractor`.
//!
//! ## Key Concepts
//!
//! - **Report**: Root of the graph, one per extraction request
//! - **Dataset**: A cube, an ad-hoc report, a shortcut or an unresolved reference
//! - **Attribute / AttributeForm**: Dimensions and the columns that populate them
//! - **Metric**: Simple (function over a fact), composite (function over metrics) or embedded
//! - **Fact / Function / LogicTable**: Leaves of the lineage graph
//!
//! ## Sharing Model
//!
//! Canonical definitions (`AttributeDefinition`, `MetricDefinition`, `Fact`,
//! `Function`) are immutable and shared behind `Arc`. Every dataset that
//! references one gets its own lightweight wrapper carrying the
//! dataset-scoped fields, so mutating one dataset's view never leaks into
//! another while the parse cost is paid only once.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attribute;
pub mod dataset;
pub mod id;
pub mod metric;
pub mod report;
pub mod table;
pub mod traits;

// Re-exports for convenience
pub use attribute::{Attribute, AttributeDefinition, AttributeForm};
pub use dataset::{Dataset, DatasetKind};
pub use id::{FileRef, ObjectId};
pub use metric::{Fact, Function, Metric, MetricDefinition, MetricKind};
pub use report::{Report, ReportRef};
pub use table::LogicTable;
