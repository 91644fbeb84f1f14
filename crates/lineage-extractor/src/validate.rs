//! Structural checks over an extracted report graph
//!
//! Errors mark graphs that downstream loaders would reject; warnings mark
//! graphs that are well-formed but probably incomplete.

use lineage_domain::{
    Attribute, Dataset, Fact, LogicTable, MetricDefinition, MetricKind, ObjectId, Report,
};
use std::collections::HashSet;

/// Findings of a validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that make the graph unusable
    pub errors: Vec<String>,
    /// Gaps worth a look
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Whether no errors were found
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Append another report's findings
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

struct Validator {
    report: ValidationReport,
    seen_metrics: HashSet<ObjectId>,
    seen_facts: HashSet<ObjectId>,
}

impl Validator {
    fn check_id(&mut self, what: &str, name: &str, id: &ObjectId) {
        if !id.is_canonical() {
            self.report
                .errors
                .push(format!("{} {} has non-canonical id {}", what, name, id));
        }
    }

    fn warn(&mut self, message: String) {
        self.report.warnings.push(message);
    }

    fn dataset(&mut self, dataset: &Dataset) {
        if dataset.kind.is_extractable() && dataset.is_empty() {
            self.warn(format!("dataset {} has no attributes or metrics", dataset.name));
        }
        for attribute in &dataset.attributes {
            self.attribute(attribute);
        }
        for metric in &dataset.metrics {
            self.metric(&metric.definition);
        }
    }

    fn attribute(&mut self, attribute: &Attribute) {
        self.check_id("attribute", attribute.name(), attribute.id());
        if attribute.forms().is_empty() {
            self.warn(format!("attribute {} has no forms", attribute.name()));
        }
        for form in attribute.forms() {
            if form.tables.is_empty() {
                self.warn(format!(
                    "form {} of attribute {} has no tables",
                    form.name,
                    attribute.name()
                ));
            }
            for table in &form.tables {
                self.table(table);
            }
        }
    }

    fn metric(&mut self, definition: &MetricDefinition) {
        if !self.seen_metrics.insert(definition.id.clone()) {
            return;
        }
        self.check_id("metric", &definition.name, &definition.id);
        match definition.kind {
            MetricKind::Simple => {
                if definition.fact.is_none() {
                    self.warn(format!("simple metric {} has no fact", definition.name));
                }
            }
            MetricKind::Composite => {
                if definition.children.is_empty() {
                    self.warn(format!("composite metric {} has no children", definition.name));
                }
            }
            MetricKind::Embedded => {}
        }
        if let Some(fact) = &definition.fact {
            self.fact(fact);
        }
        for child in &definition.children {
            self.metric(child);
        }
    }

    fn fact(&mut self, fact: &Fact) {
        if !self.seen_facts.insert(fact.id.clone()) {
            return;
        }
        self.check_id("fact", &fact.name, &fact.id);
        if fact.tables.is_empty() {
            self.warn(format!("fact {} has no tables", fact.name));
        }
        for table in &fact.tables {
            self.table(table);
        }
    }

    fn table(&mut self, table: &LogicTable) {
        self.check_id("table", &table.name, &table.id);
    }
}

/// Check one report graph
pub fn validate_report(report: &Report) -> ValidationReport {
    let mut validator = Validator {
        report: ValidationReport::default(),
        seen_metrics: HashSet::new(),
        seen_facts: HashSet::new(),
    };

    validator.check_id("report", &report.name, &report.id);
    if report.datasets.is_empty() {
        validator
            .report
            .errors
            .push(format!("report {} has no datasets", report.name));
    }
    for dataset in &report.datasets {
        validator.dataset(dataset);
    }
    validator.report
}

/// Check many report graphs
pub fn validate_reports<'a>(reports: impl IntoIterator<Item = &'a Report>) -> ValidationReport {
    let mut all = ValidationReport::default();
    for report in reports {
        all.merge(validate_report(report));
    }
    all
}
