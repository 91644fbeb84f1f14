//! Reports - the roots of the extracted graph

use crate::{Dataset, FileRef, ObjectId};
use serde::{Deserialize, Serialize};

/// A report as listed in the document index, before extraction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportRef {
    /// Report name
    pub name: String,

    /// Report id (the index anchor), when it is a valid id
    pub id: Option<ObjectId>,

    /// Document and anchor holding the report definition
    pub file: FileRef,
}

/// A fully extracted report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Report name
    pub name: String,

    /// Report id
    pub id: ObjectId,

    /// Defining document
    pub file: FileRef,

    /// Datasets in document order
    pub datasets: Vec<Dataset>,
}

impl Report {
    /// Total attributes across datasets
    pub fn attribute_count(&self) -> usize {
        self.datasets.iter().map(|d| d.attributes.len()).sum()
    }

    /// Total top-level metrics across datasets
    pub fn metric_count(&self) -> usize {
        self.datasets.iter().map(|d| d.metrics.len()).sum()
    }
}
