//! Metrics collection for extraction runs

use crate::diagnostics::DiagnosticKind;
use std::collections::HashMap;

/// Counters collected while extracting reports
///
/// Each builder keeps its own; the batch merges them at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionMetrics {
    /// Diagnostics recorded, per kind
    pub diagnostics: HashMap<DiagnosticKind, usize>,

    /// Reports extracted successfully
    pub reports_extracted: usize,

    /// Reports that failed and were excluded
    pub reports_failed: usize,

    /// Datasets emitted
    pub datasets: usize,

    /// Metric definitions built from their sections (memo misses)
    pub metrics_built: usize,

    /// Metric lookups served from the memo
    pub metric_memo_hits: usize,

    /// Attribute definitions built from their sections
    pub attributes_built: usize,

    /// Attribute lookups served from the memo
    pub attribute_memo_hits: usize,
}

impl ExtractionMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic
    pub fn record_diagnostic(&mut self, kind: DiagnosticKind) {
        *self.diagnostics.entry(kind).or_insert(0) += 1;
    }

    /// Record an extracted report and its dataset count
    pub fn record_report(&mut self, datasets: usize) {
        self.reports_extracted += 1;
        self.datasets += datasets;
    }

    /// Record a failed report
    pub fn record_failure(&mut self) {
        self.reports_failed += 1;
    }

    /// Diagnostics of one kind
    pub fn diagnostic_count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.get(&kind).copied().unwrap_or(0)
    }

    /// Diagnostics across all kinds
    pub fn total_diagnostics(&self) -> usize {
        self.diagnostics.values().sum()
    }

    /// Add another collector's counts to this one
    pub fn merge(&mut self, other: &ExtractionMetrics) {
        for (kind, count) in &other.diagnostics {
            *self.diagnostics.entry(*kind).or_insert(0) += count;
        }
        self.reports_extracted += other.reports_extracted;
        self.reports_failed += other.reports_failed;
        self.datasets += other.datasets;
        self.metrics_built += other.metrics_built;
        self.metric_memo_hits += other.metric_memo_hits;
        self.attributes_built += other.attributes_built;
        self.attribute_memo_hits += other.attribute_memo_hits;
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Extraction Metrics Summary".to_string(),
            "==========================".to_string(),
            format!(
                "Reports: {} extracted, {} failed",
                self.reports_extracted, self.reports_failed
            ),
            format!("Datasets: {}", self.datasets),
            format!(
                "Metrics: {} built, {} reused",
                self.metrics_built, self.metric_memo_hits
            ),
            format!(
                "Attributes: {} built, {} reused",
                self.attributes_built, self.attribute_memo_hits
            ),
        ];

        if !self.diagnostics.is_empty() {
            lines.push(String::new());
            lines.push("Diagnostics:".to_string());
            for kind in DiagnosticKind::ALL {
                let count = self.diagnostic_count(kind);
                if count > 0 {
                    lines.push(format!("  {}: {}", kind, count));
                }
            }
            lines.push(format!("  Total: {}", self.total_diagnostics()));
        }

        lines.join("\n")
    }
}
