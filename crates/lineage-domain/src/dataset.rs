//! Datasets - the containers of attributes and metrics inside a report

use crate::{Attribute, FileRef, Metric, ObjectId};
use serde::{Deserialize, Serialize};

/// How a dataset is rendered in the documentation, which decides how its
/// attributes and metrics are read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatasetKind {
    /// An intelligent cube, laid out as a template-objects table
    TabularCube,
    /// A report used as a dataset, laid out with rows/columns markers
    AdHocReport {
        /// Chart type shown in the report's chart options, if any
        #[serde(skip_serializing_if = "Option::is_none")]
        chart_type: Option<String>,
    },
    /// A shortcut to another object; nothing is extracted from it
    Shortcut,
    /// Not found in any dataset index
    Unresolved,
}

impl DatasetKind {
    /// Short label for display
    pub fn label(&self) -> &'static str {
        match self {
            DatasetKind::TabularCube => "cube",
            DatasetKind::AdHocReport { .. } => "report",
            DatasetKind::Shortcut => "shortcut",
            DatasetKind::Unresolved => "unresolved",
        }
    }

    /// Chart type, only ever present on ad-hoc reports
    pub fn chart_type(&self) -> Option<&str> {
        match self {
            DatasetKind::AdHocReport { chart_type } => chart_type.as_deref(),
            DatasetKind::TabularCube | DatasetKind::Shortcut | DatasetKind::Unresolved => None,
        }
    }

    /// Whether attributes and metrics are read for this kind
    pub fn is_extractable(&self) -> bool {
        match self {
            DatasetKind::TabularCube | DatasetKind::AdHocReport { .. } => true,
            DatasetKind::Shortcut | DatasetKind::Unresolved => false,
        }
    }
}

/// A dataset referenced by a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Dataset name
    pub name: String,

    /// Dataset id, synthesized when the corpus has none
    pub id: ObjectId,

    /// Defining document
    pub file: Option<FileRef>,

    /// Owning report
    pub report_id: ObjectId,

    /// Rendering kind
    #[serde(flatten)]
    pub kind: DatasetKind,

    /// Attributes in document order
    pub attributes: Vec<Attribute>,

    /// Metrics in document order
    pub metrics: Vec<Metric>,
}

impl Dataset {
    /// A dataset with no attributes or metrics yet
    pub fn empty(
        name: impl Into<String>,
        id: ObjectId,
        report_id: ObjectId,
        kind: DatasetKind,
        file: Option<FileRef>,
    ) -> Self {
        Self {
            name: name.into(),
            id,
            file,
            report_id,
            kind,
            attributes: Vec::new(),
            metrics: Vec::new(),
        }
    }

    /// Whether nothing was extracted
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.metrics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_type_only_on_reports() {
        let kind = DatasetKind::AdHocReport {
            chart_type: Some("Barra vertical".to_string()),
        };
        assert_eq!(kind.chart_type(), Some("Barra vertical"));
        assert_eq!(DatasetKind::TabularCube.chart_type(), None);
        assert!(!DatasetKind::Shortcut.is_extractable());
    }

    #[test]
    fn test_kind_is_flattened_into_dataset() {
        let ds = Dataset::empty(
            "Vendas",
            ObjectId::parse("AA").unwrap(),
            ObjectId::parse("BB").unwrap(),
            DatasetKind::AdHocReport {
                chart_type: Some("Pizza".to_string()),
            },
            None,
        );
        let json = serde_json::to_value(&ds).unwrap();
        assert_eq!(json["kind"], "ad_hoc_report");
        assert_eq!(json["chart_type"], "Pizza");
        assert!(ds.is_empty());
    }
}
