//! Lineage Extractor
//!
//! Reconstructs the entity graph behind each report of an exported BI
//! documentation corpus: report → datasets → attributes/metrics →
//! forms/facts/functions → logic tables.
//!
//! ## Overview
//!
//! - [`Corpus`] ties a corpus root to its locale vocabulary and the shared
//!   parse cache
//! - [`LinkResolver`] finds objects in per-type index documents by id, then
//!   by progressively looser name matching
//! - [`fields`] reads one object's fields out of its located section
//! - [`GraphBuilder`] resolves, recurses and memoizes, recording every
//!   recoverable problem as a [`Diagnostic`]
//! - [`BatchExtractor`] runs builders on a fixed worker pool
//!
//! ## Example Usage
//!
//! ```no_run
//! use lineage_extractor::{BatchExtractor, Corpus, ExtractorConfig};
//!
//! # async fn example() -> lineage_extractor::Result<()> {
//! let corpus = Corpus::open("/exports/project", ExtractorConfig::default())?;
//! let reports = corpus.filter("vendas")?;
//!
//! let outcome = BatchExtractor::new(corpus).run(reports).await?.sorted();
//! for report in &outcome.reports {
//!     println!("{}: {} datasets", report.name, report.datasets.len());
//! }
//! println!("{}", outcome.summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure Model
//!
//! Missing files, missing sections, unresolved links and metric cycles never
//! abort a report; they become diagnostics and the graph is built around
//! them. Only unreadable documents fail a report, and a failed report is
//! excluded from the batch without stopping it.

#![warn(missing_docs)]

mod batch;
mod builder;
mod config;
mod corpus;
mod diagnostics;
mod error;
pub mod fields;
mod links;
mod locale;
mod metrics;
pub mod normalize;
mod resolver;
mod types;
mod validate;

#[cfg(test)]
mod tests;

pub use batch::{BatchExtractor, BatchWorker};
pub use builder::{GraphBuilder, Target, VisitingSet};
pub use config::ExtractorConfig;
pub use corpus::Corpus;
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use error::{ExtractorError, Result};
pub use links::{href_id, placeholder_id, DocLink};
pub use locale::{IndexKind, Locale, DEFAULT_LOCALE, EN_US, PT_BR};
pub use metrics::ExtractionMetrics;
pub use resolver::{fuzzy_score, IndexEntry, LinkResolver, LinkResult, MatchStrategy};
pub use types::{BatchOutcome, ReportFailure};
pub use validate::{validate_report, validate_reports, ValidationReport};
