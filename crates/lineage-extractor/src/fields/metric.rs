//! Metric definitions: kind, formula and the objects the formula references

use super::{labeled_value, preceding_icon, titled_block};
use crate::links::{dedup_by_id, DocLink, PLACEHOLDER_MARK};
use crate::locale::Locale;
use crate::normalize::{collapse_whitespace, fold_upper};
use lineage_document::{DocumentTree, NodeId};
use lineage_domain::{FileRef, MetricKind, ObjectId};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static SPACE_BEFORE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(\s*").expect("paren pattern is valid"));
static SPACE_AROUND_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\)\s*").expect("paren pattern is valid"));

/// What a formula link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Referent {
    /// Aggregation function
    Function,
    /// Fact
    Fact,
    /// Another metric
    Metric,
    /// Could not be determined from the icon or position
    Unclassified,
}

/// A link inside a metric formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaRef {
    /// Link text
    pub name: String,
    /// Placeholder id
    pub id: ObjectId,
    /// Target document
    pub file: Option<FileRef>,
    /// Classified referent
    pub referent: Referent,
    /// Icon that preceded the link, lower-cased
    pub icon: Option<String>,
}

/// Fields read from a metric section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricFields {
    /// Simple or composite
    pub kind: MetricKind,
    /// Rendered formula text
    pub formula: Option<String>,
    /// Every placeholder link of the formula, in document order
    pub references: Vec<FormulaRef>,
}

impl MetricFields {
    fn first(&self, referent: Referent) -> Option<&FormulaRef> {
        self.references.iter().find(|r| r.referent == referent)
    }

    /// The aggregation function
    pub fn function(&self) -> Option<&FormulaRef> {
        self.first(Referent::Function)
    }

    /// The aggregated fact
    pub fn fact(&self) -> Option<&FormulaRef> {
        self.first(Referent::Fact)
    }

    /// Child metrics in document order, first occurrence of each id kept
    pub fn children(&self) -> Vec<&FormulaRef> {
        let mut seen = HashSet::new();
        self.references
            .iter()
            .filter(|r| r.referent == Referent::Metric && seen.insert(&r.id))
            .collect()
    }

    /// Links whose referent could not be determined
    pub fn unclassified(&self) -> impl Iterator<Item = &FormulaRef> {
        self.references
            .iter()
            .filter(|r| r.referent == Referent::Unclassified)
    }
}

/// Read a metric's kind and formula from its section
pub fn read_metric(doc: &DocumentTree, section: NodeId, locale: &Locale) -> MetricFields {
    let block = titled_block(doc, section, locale.sections.definition);

    let kind = match labeled_value(doc, &block, locale.headers.metric_type) {
        Some(cell) if locale.is_composite(&doc.text(cell)) => MetricKind::Composite,
        _ => MetricKind::Simple,
    };

    let Some(cell) = labeled_value(doc, &block, locale.headers.formula) else {
        return MetricFields {
            kind,
            formula: None,
            references: Vec::new(),
        };
    };

    MetricFields {
        kind,
        formula: formula_text(doc, cell),
        references: formula_references(doc, cell, locale),
    }
}

/// Classify each placeholder link of a formula cell by the icon before it
///
/// Without an icon, the first positional link is the function and the second
/// is the fact; anything else is left unclassified.
pub fn formula_references(doc: &DocumentTree, cell: NodeId, locale: &Locale) -> Vec<FormulaRef> {
    let mut last_icon: Option<String> = None;
    let mut positional = 0;
    let mut references = Vec::new();

    for node in doc.descendants(cell) {
        if doc.is_tag(node, "img") {
            last_icon = doc.attr(node, "src").map(|s| s.to_lowercase());
            continue;
        }
        let Some(link) = DocLink::at(doc, node) else {
            continue;
        };
        if !link.has_placeholder() {
            continue;
        }
        let Some(id) = link.id.clone() else {
            continue;
        };

        let referent = match &last_icon {
            Some(icon) => classify_icon(icon, locale),
            None => {
                positional += 1;
                match positional {
                    1 => Referent::Function,
                    2 => Referent::Fact,
                    _ => Referent::Unclassified,
                }
            }
        };

        references.push(FormulaRef {
            file: link.file_ref(),
            name: link.text,
            id,
            referent,
            icon: last_icon.clone(),
        });
    }

    references
}

fn classify_icon(icon: &str, locale: &Locale) -> Referent {
    if icon.contains(locale.icons.function) {
        Referent::Function
    } else if icon.contains(locale.icons.fact) {
        Referent::Fact
    } else if icon.contains(locale.icons.metric) {
        Referent::Metric
    } else {
        Referent::Unclassified
    }
}

/// Formula text with consecutive repeated fragments dropped
///
/// Parentheses and operators may legitimately repeat.
pub fn formula_text(doc: &DocumentTree, cell: NodeId) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for node in doc.descendants(cell) {
        let lineage_document::NodeData::Text(text) = doc.data(node) else {
            continue;
        };
        let part = text.trim();
        if part.is_empty() {
            continue;
        }
        let repeatable = matches!(part, "(" | ")" | "/" | "+" | "-" | "*");
        if !repeatable && parts.last().map(|p| p == part).unwrap_or(false) {
            continue;
        }
        parts.push(part.to_string());
    }
    if parts.is_empty() {
        return None;
    }

    let joined = collapse_whitespace(&parts.join(" "));
    let opened = SPACE_BEFORE_OPEN.replace_all(&joined, " (");
    let closed = SPACE_AROUND_CLOSE.replace_all(&opened, ")");
    Some(closed.trim().to_string())
}

/// Child metrics listed under `EMBEDDED METRIC` comments of a section
///
/// Composite formulas too complex to render inline list their operands in
/// a separate block; only metric-iconed placeholder links are taken.
pub fn embedded_metric_links(doc: &DocumentTree, section: NodeId, locale: &Locale) -> Vec<DocLink> {
    let marker = fold_upper(locale.markers.embedded_metric);
    let compact = marker.replace(' ', "");

    let mut links = Vec::new();
    for node in doc.descendants(section) {
        let Some(comment) = doc.comment(node) else {
            continue;
        };
        let comment = fold_upper(comment);
        if !comment.contains(&marker) && !comment.contains(&compact) {
            continue;
        }
        let Some(table) = doc.closest(node, "table") else {
            continue;
        };
        for link in doc.find_all(table, "a").filter_map(|a| DocLink::at(doc, a)) {
            if !link.href.contains(PLACEHOLDER_MARK) || link.id.is_none() {
                continue;
            }
            let is_metric = preceding_icon(doc, link.node, table)
                .map(|icon| icon.contains(locale.icons.metric))
                .unwrap_or(false);
            if is_metric {
                links.push(link);
            }
        }
    }
    dedup_by_id(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::PT_BR;

    fn metric_section(definition: &str) -> String {
        format!(
            r#"<table><tr><td><a name="AA01"></a>
                 <table class="SECTIONHEADER"><tr><td>DEFINIÇÃO</td></tr></table>
                 <table>{}</table>
               </td></tr></table>"#,
            definition
        )
    }

    fn read(html: &str) -> MetricFields {
        let doc = DocumentTree::from_html(html);
        let section = doc.closest(doc.anchor("AA01").unwrap(), "tr").unwrap();
        read_metric(&doc, section, &PT_BR)
    }

    #[test]
    fn test_simple_metric_by_icons() {
        let fields = read(&metric_section(
            r#"<tr><td>Tipo de métrica</td><td>Simples</td></tr>
               <tr><td>FÓRMULA</td><td><img src="Function.bmp"><a href="Função.html#[$$$$F1$$$$]">Sum</a>(<img src="Fact.bmp"><a href="Fato.html#[$$$$FA$$$$]">Receita</a>)</td></tr>"#,
        ));

        assert_eq!(fields.kind, MetricKind::Simple);
        assert_eq!(fields.formula.as_deref(), Some("Sum (Receita)"));
        assert_eq!(fields.function().unwrap().id.as_str(), "F1");
        assert_eq!(fields.fact().unwrap().name, "Receita");
        assert!(fields.children().is_empty());
    }

    #[test]
    fn test_positional_fallback() {
        let fields = read(&metric_section(
            r#"<tr><td>FÓRMULA</td><td><a href="Função.html#[$$$$F1$$$$]">Sum</a>(<a href="Fato.html#[$$$$FA$$$$]">Receita</a>, <a href="X.html#[$$$$0B$$$$]">Extra</a>)</td></tr>"#,
        ));

        assert_eq!(fields.function().unwrap().id.as_str(), "F1");
        assert_eq!(fields.fact().unwrap().id.as_str(), "FA");
        let unclassified: Vec<_> = fields.unclassified().map(|r| r.name.as_str()).collect();
        assert_eq!(unclassified, vec!["Extra"]);
    }

    #[test]
    fn test_unknown_icon_is_unclassified() {
        let fields = read(&metric_section(
            r#"<tr><td>FÓRMULA</td><td><img src="Prompt.bmp"><a href="P.html#[$$$$0C$$$$]">Ano?</a></td></tr>"#,
        ));
        assert!(fields.function().is_none());
        assert_eq!(fields.unclassified().count(), 1);
    }

    #[test]
    fn test_composite_children_deduplicated() {
        let fields = read(&metric_section(
            r#"<tr><td>Tipo de métrica</td><td>Composto</td></tr>
               <tr><td>FÓRMULA</td><td>
                 <img src="Metric.bmp"><a href="Métrica.html#[$$$$0A$$$$]">X</a> /
                 <img src="Metric.bmp"><a href="Métrica.html#[$$$$0B$$$$]">Y</a> -
                 <img src="Metric.bmp"><a href="Métrica.html#[$$$$0a$$$$]">X</a>
               </td></tr>"#,
        ));

        assert_eq!(fields.kind, MetricKind::Composite);
        let ids: Vec<_> = fields.children().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["0A", "0B"]);
        assert_eq!(fields.references.len(), 3);
    }

    #[test]
    fn test_missing_formula_row() {
        let fields = read(&metric_section(
            "<tr><td>Tipo de métrica</td><td>Composto</td></tr>",
        ));
        assert_eq!(fields.kind, MetricKind::Composite);
        assert!(fields.formula.is_none());
        assert!(fields.references.is_empty());
    }

    #[test]
    fn test_embedded_metric_block() {
        let html = r#"<table><tr><td><a name="AA01"></a>
            <table><tr><td><!-- EMBEDDED METRIC --></td></tr>
              <tr><td><img src="Metric.bmp"><a href="Métrica.html#[$$$$0D$$$$]">Margem</a></td></tr>
              <tr><td><img src="Fact.bmp"><a href="Fato.html#[$$$$0E$$$$]">Custo</a></td></tr>
            </table>
          </td></tr></table>"#;
        let doc = DocumentTree::from_html(html);
        let section = doc.closest(doc.anchor("AA01").unwrap(), "tr").unwrap();
        let links = embedded_metric_links(&doc, section, &PT_BR);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].text, "Margem");
    }
}
