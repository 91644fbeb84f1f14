//! Metrics, facts and functions

use crate::{FileRef, LogicTable, ObjectId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// How a metric is defined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// A function applied to a fact
    Simple,
    /// A function applied to other metrics
    Composite,
    /// Defined inline in a dataset, absent from the metric index
    Embedded,
}

impl MetricKind {
    /// Lower-case label
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Simple => "simple",
            MetricKind::Composite => "composite",
            MetricKind::Embedded => "embedded",
        }
    }
}

/// An aggregation function (Sum, Count, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    /// Function name
    pub name: String,
    /// Function id
    pub id: ObjectId,
    /// Defining document
    pub file: Option<FileRef>,
}

/// A fact and the tables/columns it reads from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    /// Fact name
    pub name: String,
    /// Fact id
    pub id: ObjectId,
    /// Defining document
    pub file: Option<FileRef>,
    /// Source tables, each annotated with its expression column
    pub tables: Vec<LogicTable>,
}

/// Canonical metric data, shared across datasets once built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDefinition {
    /// Metric name
    pub name: String,

    /// Metric id
    pub id: ObjectId,

    /// Defining document
    pub file: Option<FileRef>,

    /// Definition kind
    pub kind: MetricKind,

    /// Formula as rendered in the documentation
    pub formula: Option<String>,

    /// Aggregation function (simple metrics)
    pub function: Option<Arc<Function>>,

    /// Aggregated fact (simple metrics)
    pub fact: Option<Arc<Fact>>,

    /// Child metrics (composite metrics), fully materialized
    ///
    /// Children carry no dataset scope; only the wrapper a dataset holds does.
    pub children: Vec<Arc<MetricDefinition>>,
}

impl MetricDefinition {
    /// A metric defined inline in a dataset
    pub fn embedded(name: impl Into<String>, id: ObjectId, file: Option<FileRef>) -> Self {
        Self {
            name: name.into(),
            id,
            file,
            kind: MetricKind::Embedded,
            formula: None,
            function: None,
            fact: None,
            children: Vec::new(),
        }
    }

    /// Ids of the direct children, in order
    pub fn child_ids(&self) -> Vec<&ObjectId> {
        self.children.iter().map(|c| &c.id).collect()
    }

    /// Whether any metric in this subtree contains itself along its own path
    pub fn has_path_cycle(&self) -> bool {
        fn walk<'a>(metric: &'a MetricDefinition, path: &mut HashSet<&'a ObjectId>) -> bool {
            if !path.insert(&metric.id) {
                return true;
            }
            let found = metric.children.iter().any(|child| walk(child, path));
            path.remove(&metric.id);
            found
        }
        walk(self, &mut HashSet::new())
    }

    /// Number of metrics in this subtree, including itself
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| child.subtree_len())
            .sum::<usize>()
    }
}

/// A metric as it appears inside one dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    /// Owning dataset
    pub dataset_id: ObjectId,

    /// Shared canonical data
    #[serde(flatten)]
    pub definition: Arc<MetricDefinition>,
}

impl Metric {
    /// Scope a definition to a dataset
    pub fn new(definition: Arc<MetricDefinition>, dataset_id: ObjectId) -> Self {
        Self {
            dataset_id,
            definition,
        }
    }

    /// Metric name
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Metric id
    pub fn id(&self) -> &ObjectId {
        &self.definition.id
    }

    /// Definition kind
    pub fn kind(&self) -> MetricKind {
        self.definition.kind
    }

    /// Direct children
    pub fn children(&self) -> &[Arc<MetricDefinition>] {
        &self.definition.children
    }

    /// Whether any metric in this subtree contains itself along its own path
    pub fn has_path_cycle(&self) -> bool {
        self.definition.has_path_cycle()
    }

    /// Number of metrics in this subtree, including itself
    pub fn subtree_len(&self) -> usize {
        self.definition.subtree_len()
    }
}
