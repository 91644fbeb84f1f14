//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use lineage_document::CacheStats;
use lineage_domain::{Report, ReportRef};
use lineage_extractor::{ReportFailure, ValidationReport};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Whether results go to stdout as JSON.
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Format the per-report summary of an extraction.
    pub fn format_reports(&self, reports: &[Report]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> = reports
                    .iter()
                    .map(|r| {
                        serde_json::json!({
                            "id": r.id,
                            "name": r.name,
                            "datasets": r.datasets.len(),
                            "attributes": r.attribute_count(),
                            "metrics": r.metric_count(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            OutputFormat::Text => Ok(self.reports_table(reports)),
        }
    }

    fn reports_table(&self, reports: &[Report]) -> String {
        if reports.is_empty() {
            return self.colorize("No reports extracted.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Report", "Datasets", "Attributes", "Metrics"]);

        for report in reports {
            let id = report.id.as_str();
            builder.push_record([
                id[..id.len().min(8)].to_string(),
                report.name.clone(),
                report.datasets.len().to_string(),
                report.attribute_count().to_string(),
                report.metric_count().to_string(),
            ]);
        }

        let total_attributes: usize = reports.iter().map(Report::attribute_count).sum();
        let total_metrics: usize = reports.iter().map(Report::metric_count).sum();
        let total_datasets: usize = reports.iter().map(|r| r.datasets.len()).sum();
        builder.push_record([
            String::new(),
            "Total".to_string(),
            total_datasets.to_string(),
            total_attributes.to_string(),
            total_metrics.to_string(),
        ]);

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format the reports listed in a corpus.
    pub fn format_report_refs(&self, reports: &[ReportRef]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(reports)?),
            OutputFormat::Text => {
                if reports.is_empty() {
                    return Ok(self.colorize("No reports found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Report", "File"]);
                for report in reports {
                    let id = report
                        .id
                        .as_ref()
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    builder.push_record([id, report.name.clone(), report.file.href()]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format parse cache counters.
    pub fn format_cache_stats(&self, stats: &CacheStats, warmed: usize) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "warmed": warmed,
                "size": stats.size,
                "hits": stats.hits,
                "misses": stats.misses,
                "hit_rate": stats.hit_rate(),
            }))?),
            OutputFormat::Text => {
                let mut builder = Builder::default();
                builder.push_record(["Warmed", "Cached", "Hits", "Misses", "Hit rate"]);
                builder.push_record([
                    warmed.to_string(),
                    stats.size.to_string(),
                    stats.hits.to_string(),
                    stats.misses.to_string(),
                    format!("{:.1}%", stats.hit_rate() * 100.0),
                ]);

                let mut table = builder.build();
                table.with(Style::rounded());
                Ok(table.to_string())
            }
        }
    }

    /// Format the reports a batch had to leave out.
    pub fn failures(&self, failures: &[ReportFailure]) -> Vec<String> {
        failures
            .iter()
            .map(|f| self.error(&format!("{}: {}", f.report.name, f.reason)))
            .collect()
    }

    /// Format graph validation findings.
    pub fn validation(&self, report: &ValidationReport) -> Vec<String> {
        let mut lines: Vec<String> = report.errors.iter().map(|e| self.error(e)).collect();
        lines.extend(report.warnings.iter().map(|w| self.warning(w)));
        if report.is_valid() && report.warnings.is_empty() {
            lines.push(self.success("Graph validation passed"));
        }
        lines
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
