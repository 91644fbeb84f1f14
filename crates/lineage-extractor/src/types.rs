//! Result types for batch extraction

use crate::metrics::ExtractionMetrics;
use lineage_document::CacheStats;
use lineage_domain::{Report, ReportRef};

/// A report that could not be extracted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFailure {
    /// The report that failed
    pub report: ReportRef,

    /// Error or panic message
    pub reason: String,
}

/// Result of a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Extracted reports, in completion order
    pub reports: Vec<Report>,

    /// Reports excluded because extraction failed
    pub failures: Vec<ReportFailure>,

    /// Counters merged across workers
    pub metrics: ExtractionMetrics,

    /// Parse cache counters at the end of the run
    pub cache: CacheStats,
}

impl BatchOutcome {
    /// Order reports by id, failures by report name
    pub fn sorted(mut self) -> Self {
        self.reports.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        self.failures.sort_by(|a, b| a.report.name.cmp(&b.report.name));
        self
    }

    /// Whether every report was extracted
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary of the run
    pub fn summary(&self) -> String {
        format!(
            "{}\n\n{}",
            self.metrics.summary(),
            self.cache.summary()
        )
    }
}
