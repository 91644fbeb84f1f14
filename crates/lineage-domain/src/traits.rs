//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the domain model and the
//! extraction infrastructure.

use crate::{Report, ReportRef};

/// Trait for turning a listed report into its extracted graph
///
/// Implemented by the extraction layer (lineage-extractor). Implementations
/// are used from a single thread at a time and may keep memo state between
/// calls.
pub trait ReportExtractor {
    /// Error type for fatal extraction failures
    type Error;

    /// Extract one report
    fn extract_report(&mut self, report: &ReportRef) -> Result<Report, Self::Error>;
}
