//! JSON export of extracted reports.
//!
//! File references are stored relative to the corpus root. The export
//! prefixes every one of them with the base path so downstream loaders can
//! open the defining documents directly.

use crate::error::Result;
use lineage_domain::{
    Attribute, AttributeDefinition, AttributeForm, Dataset, Fact, FileRef, Function, LogicTable,
    Metric, MetricDefinition, Report,
};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Top-level export document.
#[derive(Debug, Serialize)]
pub struct Export {
    /// Extracted reports
    pub reports: Vec<Report>,
}

impl Export {
    /// Build an export, rebasing every file reference onto `base`.
    pub fn new(reports: &[Report], base: &str) -> Self {
        Self {
            reports: reports.iter().map(|r| r.rebase(base)).collect(),
        }
    }

    /// Render as JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Write to `path`, creating parent directories.
    pub fn write(&self, path: &Path, pretty: bool) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json(pretty)?)?;
        Ok(())
    }
}

/// Copy of a value with its file references prefixed by a base path.
trait Rebase {
    fn rebase(&self, base: &str) -> Self;
}

impl Rebase for FileRef {
    fn rebase(&self, base: &str) -> Self {
        self.with_base(base)
    }
}

impl<T: Rebase> Rebase for Option<T> {
    fn rebase(&self, base: &str) -> Self {
        self.as_ref().map(|v| v.rebase(base))
    }
}

impl<T: Rebase> Rebase for Vec<T> {
    fn rebase(&self, base: &str) -> Self {
        self.iter().map(|v| v.rebase(base)).collect()
    }
}

impl<T: Rebase> Rebase for Arc<T> {
    fn rebase(&self, base: &str) -> Self {
        Arc::new((**self).rebase(base))
    }
}

impl Rebase for LogicTable {
    fn rebase(&self, base: &str) -> Self {
        Self {
            file: self.file.rebase(base),
            ..self.clone()
        }
    }
}

impl Rebase for Function {
    fn rebase(&self, base: &str) -> Self {
        Self {
            file: self.file.rebase(base),
            ..self.clone()
        }
    }
}

impl Rebase for Fact {
    fn rebase(&self, base: &str) -> Self {
        Self {
            name: self.name.clone(),
            id: self.id.clone(),
            file: self.file.rebase(base),
            tables: self.tables.rebase(base),
        }
    }
}

impl Rebase for MetricDefinition {
    fn rebase(&self, base: &str) -> Self {
        Self {
            name: self.name.clone(),
            id: self.id.clone(),
            file: self.file.rebase(base),
            kind: self.kind,
            formula: self.formula.clone(),
            function: self.function.rebase(base),
            fact: self.fact.rebase(base),
            children: self.children.rebase(base),
        }
    }
}

impl Rebase for Metric {
    fn rebase(&self, base: &str) -> Self {
        Metric::new(self.definition.rebase(base), self.dataset_id.clone())
    }
}

impl Rebase for AttributeForm {
    fn rebase(&self, base: &str) -> Self {
        Self {
            name: self.name.clone(),
            id: self.id.clone(),
            tables: self.tables.rebase(base),
        }
    }
}

impl Rebase for AttributeDefinition {
    fn rebase(&self, base: &str) -> Self {
        Self {
            name: self.name.clone(),
            id: self.id.clone(),
            file: self.file.rebase(base),
            forms: self.forms.rebase(base),
        }
    }
}

impl Rebase for Attribute {
    fn rebase(&self, base: &str) -> Self {
        Attribute::new(
            self.definition.rebase(base),
            self.dataset_id.clone(),
            self.display_name.clone(),
        )
    }
}

impl Rebase for Dataset {
    fn rebase(&self, base: &str) -> Self {
        Self {
            name: self.name.clone(),
            id: self.id.clone(),
            file: self.file.rebase(base),
            report_id: self.report_id.clone(),
            kind: self.kind.clone(),
            attributes: self.attributes.rebase(base),
            metrics: self.metrics.rebase(base),
        }
    }
}

impl Rebase for Report {
    fn rebase(&self, base: &str) -> Self {
        Self {
            name: self.name.clone(),
            id: self.id.clone(),
            file: self.file.rebase(base),
            datasets: self.datasets.rebase(base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_domain::{DatasetKind, MetricKind, ObjectId};
    use tempfile::TempDir;

    fn id(s: &str) -> ObjectId {
        ObjectId::parse(s).unwrap()
    }

    fn report() -> Report {
        let fact = Fact {
            name: "Receita".to_string(),
            id: id("FA"),
            file: Some(FileRef::new("Fatos.html", Some("FA".to_string()))),
            tables: vec![LogicTable::new("FT_VENDAS", id("7A"))
                .with_file(Some(FileRef::new("Tabelas.html", None)))],
        };
        let leaf = MetricDefinition {
            name: "Receita".to_string(),
            id: id("E1"),
            file: Some(FileRef::new("Metricas.html", Some("E1".to_string()))),
            kind: MetricKind::Simple,
            formula: Some("Sum (Receita)".to_string()),
            function: None,
            fact: Some(Arc::new(fact)),
            children: Vec::new(),
        };
        let mut root = MetricDefinition::embedded(
            "Margem",
            id("E2"),
            Some(FileRef::new("Metricas.html", Some("E2".to_string()))),
        );
        root.kind = MetricKind::Composite;
        root.children = vec![Arc::new(leaf)];

        let mut dataset = Dataset::empty(
            "Cubo Vendas",
            id("C1"),
            id("A1"),
            DatasetKind::TabularCube,
            Some(FileRef::new("Cubos.html", Some("C1".to_string()))),
        );
        dataset.metrics.push(Metric::new(Arc::new(root), id("C1")));

        Report {
            name: "Painel".to_string(),
            id: id("A1"),
            file: FileRef::new("Documentos.html", Some("A1".to_string())),
            datasets: vec![dataset],
        }
    }

    #[test]
    fn test_every_file_is_rebased() {
        let export = Export::new(&[report()], "/exports/bare/");
        let json = serde_json::to_value(&export).unwrap();

        let report = &json["reports"][0];
        assert_eq!(report["file"]["file"], "/exports/bare/Documentos.html");
        let dataset = &report["datasets"][0];
        assert_eq!(dataset["file"]["file"], "/exports/bare/Cubos.html");
        assert_eq!(dataset["kind"], "tabular_cube");

        let child = &dataset["metrics"][0]["children"][0];
        assert_eq!(child["file"]["file"], "/exports/bare/Metricas.html");
        assert_eq!(child["fact"]["file"]["file"], "/exports/bare/Fatos.html");
        assert_eq!(
            child["fact"]["tables"][0]["file"]["file"],
            "/exports/bare/Tabelas.html"
        );
        assert_eq!(child["file"]["anchor"], "E1");
    }

    #[test]
    fn test_rebase_leaves_original_untouched() {
        let original = report();
        let export = Export::new(std::slice::from_ref(&original), "base");
        assert_eq!(original.file.file, "Documentos.html");
        assert_eq!(export.reports[0].file.file, "base/Documentos.html");
        let child = &export.reports[0].datasets[0].metrics[0].children()[0];
        assert_eq!(child.file.as_ref().unwrap().file, "base/Metricas.html");
        assert_eq!(
            original.datasets[0].metrics[0].children()[0].file.as_ref().unwrap().file,
            "Metricas.html"
        );
    }

    #[test]
    fn test_empty_base_keeps_paths() {
        let export = Export::new(&[report()], "");
        assert_eq!(export.reports[0].file.file, "Documentos.html");
    }

    #[test]
    fn test_write_creates_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("lineage.json");
        Export::new(&[report()], "b").write(&path, false).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\"reports\":["));
        assert!(!text.contains('\n'));
    }
}
