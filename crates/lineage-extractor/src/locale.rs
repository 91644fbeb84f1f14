//! Vocabulary tables for the documentation language
//!
//! The exporter localizes index file names and section headers. Everything
//! the extractors match on by text comes from one of these tables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The per-type index documents of a corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// Documents (the report listing)
    Document,
    /// Reports usable as datasets
    Report,
    /// Intelligent cubes
    Cube,
    /// Shortcuts
    Shortcut,
    /// Metrics
    Metric,
    /// Facts
    Fact,
    /// Functions
    Function,
    /// Attributes
    Attribute,
    /// Logic tables
    LogicTable,
}

impl IndexKind {
    /// Every index kind
    pub const ALL: [IndexKind; 9] = [
        IndexKind::Document,
        IndexKind::Report,
        IndexKind::Cube,
        IndexKind::Shortcut,
        IndexKind::Metric,
        IndexKind::Fact,
        IndexKind::Function,
        IndexKind::Attribute,
        IndexKind::LogicTable,
    ];

    /// Indexes searched, in order, to classify a dataset
    pub const DATASET_SOURCES: [IndexKind; 3] =
        [IndexKind::Cube, IndexKind::Report, IndexKind::Shortcut];
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndexKind::Document => "document",
            IndexKind::Report => "report",
            IndexKind::Cube => "cube",
            IndexKind::Shortcut => "shortcut",
            IndexKind::Metric => "metric",
            IndexKind::Fact => "fact",
            IndexKind::Function => "function",
            IndexKind::Attribute => "attribute",
            IndexKind::LogicTable => "logic table",
        };
        f.write_str(name)
    }
}

/// Index file names
#[derive(Debug, Clone, Copy)]
pub struct IndexFiles {
    /// Document index
    pub document: &'static str,
    /// Report index
    pub report: &'static str,
    /// Intelligent cube index
    pub cube: &'static str,
    /// Shortcut index
    pub shortcut: &'static str,
    /// Metric index
    pub metric: &'static str,
    /// Fact index
    pub fact: &'static str,
    /// Function index
    pub function: &'static str,
    /// Attribute index
    pub attribute: &'static str,
    /// Logic table index
    pub logic_table: &'static str,
}

/// Headers of the `SECTIONHEADER` blocks and other section titles
#[derive(Debug, Clone, Copy)]
pub struct SectionHeaders {
    /// Metric definition block
    pub definition: &'static str,
    /// Fact expressions block
    pub expressions: &'static str,
    /// Attribute form details block
    pub attribute_forms: &'static str,
    /// Chart options block of a report
    pub chart_options: &'static str,
    /// Template objects block of a cube
    pub template_objects: &'static str,
    /// Dataset listing block of a document
    pub document_definition: &'static str,
}

/// Row labels and column headers inside sections
#[derive(Debug, Clone, Copy)]
pub struct TableHeaders {
    /// "Report objects" column of the template table
    pub report_objects: &'static str,
    /// "Rows" column of the template table
    pub rows: &'static str,
    /// "Columns" column of the template table
    pub columns: &'static str,
    /// Formula row label
    pub formula: &'static str,
    /// Metric type row label
    pub metric_type: &'static str,
    /// Expression column
    pub expression: &'static str,
    /// Source tables column
    pub source_tables: &'static str,
    /// Chart type row label
    pub chart_type: &'static str,
    /// Legacy dataset list row label
    pub datasets: &'static str,
}

/// Comment markers
#[derive(Debug, Clone, Copy)]
pub struct Markers {
    /// Prefix of `[OBJECT: name]` comments
    pub object: &'static str,
    /// Start of the rows block of an ad-hoc report
    pub rows: &'static str,
    /// Start of the columns block of an ad-hoc report
    pub columns: &'static str,
    /// Block listing metrics embedded in a composite formula
    pub embedded_metric: &'static str,
}

/// Substrings of icon file names that tag a link's referent type
#[derive(Debug, Clone, Copy)]
pub struct Icons {
    /// Ad-hoc report dataset
    pub view_report: &'static str,
    /// Function reference
    pub function: &'static str,
    /// Fact reference
    pub fact: &'static str,
    /// Metric reference
    pub metric: &'static str,
}

/// Complete vocabulary for one documentation language
#[derive(Debug, Clone, Copy)]
pub struct Locale {
    /// Locale code, e.g. `pt-BR`
    pub code: &'static str,
    /// Display name
    pub name: &'static str,
    /// Index file names
    pub files: IndexFiles,
    /// Section headers
    pub sections: SectionHeaders,
    /// Row and column headers
    pub headers: TableHeaders,
    /// Metric type values meaning "composite"
    pub composite_keywords: &'static [&'static str],
    /// Comment markers
    pub markers: Markers,
    /// Icon keywords
    pub icons: Icons,
}

const ICONS: Icons = Icons {
    view_report: "viewreport",
    function: "function",
    fact: "fact",
    metric: "metric",
};

const MARKERS: Markers = Markers {
    object: "[OBJECT:",
    rows: "[ROWS]",
    columns: "[COLUMNS]",
    embedded_metric: "EMBEDDED METRIC",
};

/// Portuguese (Brazil)
pub static PT_BR: Locale = Locale {
    code: "pt-BR",
    name: "Portuguese (Brazil)",
    files: IndexFiles {
        document: "Documento.html",
        report: "Relatório.html",
        cube: "CuboInteligente.html",
        shortcut: "Atalho.html",
        metric: "Métrica.html",
        fact: "Fato.html",
        function: "Função.html",
        attribute: "Atributo.html",
        logic_table: "TabelaLógica.html",
    },
    sections: SectionHeaders {
        definition: "DEFINIÇÃO",
        expressions: "EXPRESSÕES",
        attribute_forms: "DETALHES DOS FORMULÁRIOS DE ATRIBUTO",
        chart_options: "OPÇÕES DO GRÁFICO",
        template_objects: "OBJETOS DE TEMPLATE",
        document_definition: "DOCUMENT DEFINITION",
    },
    headers: TableHeaders {
        report_objects: "OBJETOS DO RELATÓRIO",
        rows: "LINHAS",
        columns: "COLUNAS",
        formula: "FÓRMULA",
        metric_type: "Tipo de métrica",
        expression: "EXPRESSÃO",
        source_tables: "TABELAS FONTE",
        chart_type: "Tipo de gráfico",
        datasets: "Datasets:",
    },
    composite_keywords: &["composto", "composite"],
    markers: MARKERS,
    icons: ICONS,
};

/// English (United States)
pub static EN_US: Locale = Locale {
    code: "en-US",
    name: "English (United States)",
    files: IndexFiles {
        document: "Document.html",
        report: "Report.html",
        cube: "IntelligentCube.html",
        shortcut: "Shortcut.html",
        metric: "Metric.html",
        fact: "Fact.html",
        function: "Function.html",
        attribute: "Attribute.html",
        logic_table: "LogicalTable.html",
    },
    sections: SectionHeaders {
        definition: "DEFINITION",
        expressions: "EXPRESSIONS",
        attribute_forms: "ATTRIBUTE FORM DETAILS",
        chart_options: "CHART OPTIONS",
        template_objects: "TEMPLATE OBJECTS",
        document_definition: "DOCUMENT DEFINITION",
    },
    headers: TableHeaders {
        report_objects: "REPORT OBJECTS",
        rows: "ROWS",
        columns: "COLUMNS",
        formula: "FORMULA",
        metric_type: "Metric Type",
        expression: "EXPRESSION",
        source_tables: "SOURCE TABLES",
        chart_type: "Chart Type",
        datasets: "Datasets:",
    },
    composite_keywords: &["composite"],
    markers: MARKERS,
    icons: ICONS,
};

static LOCALES: [&Locale; 2] = [&PT_BR, &EN_US];

/// Locale used when none is configured
pub const DEFAULT_LOCALE: &str = "pt-BR";

impl Locale {
    /// Look up a locale by code, case-insensitively (`pt-BR`, `pt_br`, `en-us`)
    pub fn by_code(code: &str) -> Option<&'static Locale> {
        let wanted = code.trim().replace('_', "-");
        LOCALES
            .iter()
            .copied()
            .find(|l| l.code.eq_ignore_ascii_case(&wanted))
    }

    /// Every available locale
    pub fn available() -> &'static [&'static Locale] {
        &LOCALES
    }

    /// File name of an index document
    pub fn index_file(&self, kind: IndexKind) -> &'static str {
        match kind {
            IndexKind::Document => self.files.document,
            IndexKind::Report => self.files.report,
            IndexKind::Cube => self.files.cube,
            IndexKind::Shortcut => self.files.shortcut,
            IndexKind::Metric => self.files.metric,
            IndexKind::Fact => self.files.fact,
            IndexKind::Function => self.files.function,
            IndexKind::Attribute => self.files.attribute,
            IndexKind::LogicTable => self.files.logic_table,
        }
    }

    /// Whether a metric type value denotes a composite metric
    pub fn is_composite(&self, value: &str) -> bool {
        let value = value.to_lowercase();
        self.composite_keywords.iter().any(|k| value.contains(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_code() {
        assert_eq!(Locale::by_code("pt-BR").unwrap().code, "pt-BR");
        assert_eq!(Locale::by_code("en_us").unwrap().code, "en-US");
        assert!(Locale::by_code("fr-FR").is_none());
    }

    #[test]
    fn test_index_files_are_distinct() {
        for locale in Locale::available() {
            let mut files: Vec<_> = IndexKind::ALL.iter().map(|k| locale.index_file(*k)).collect();
            files.sort();
            files.dedup();
            assert_eq!(files.len(), IndexKind::ALL.len(), "{}", locale.code);
        }
    }

    #[test]
    fn test_composite_keywords() {
        assert!(PT_BR.is_composite("Composto"));
        assert!(PT_BR.is_composite("composite"));
        assert!(!PT_BR.is_composite("Simples"));
        assert!(EN_US.is_composite("Composite metric"));
    }
}
