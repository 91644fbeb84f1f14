//! Report sections: the datasets a report is built from

use super::{find_cell, labeled_value};
use crate::links::{dedup_by_id, links_in};
use crate::locale::Locale;
use lineage_document::{DocumentTree, NodeId};
use lineage_domain::{FileRef, ObjectId};

/// A dataset as referenced from a report, before resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRef {
    /// Name as printed in the report
    pub name: String,
    /// Placeholder id, when the reference is a link
    pub id: Option<ObjectId>,
    /// Link target, when the reference is a link
    pub file: Option<FileRef>,
}

/// Datasets listed under the document-definition block, in order
///
/// Links of the table after the block title are the datasets. Exports
/// without links print a `Datasets:` row of comma-separated names instead.
pub fn read_report_datasets(doc: &DocumentTree, section: NodeId, locale: &Locale) -> Vec<DatasetRef> {
    let Some(title) = find_cell(doc, section, locale.sections.document_definition) else {
        return Vec::new();
    };
    let Some(table) = doc.next_tag_within(title, "table", section) else {
        return Vec::new();
    };

    let linked: Vec<DatasetRef> = dedup_by_id(links_in(doc, table))
        .into_iter()
        .filter(|l| !l.text.is_empty())
        .map(|l| DatasetRef {
            file: l.file_ref(),
            name: l.text,
            id: l.id,
        })
        .collect();
    if !linked.is_empty() {
        return linked;
    }

    let nodes: Vec<_> = doc.descendants(table).collect();
    labeled_value(doc, &nodes, locale.headers.datasets)
        .map(|cell| {
            doc.raw_text(cell)
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(|name| DatasetRef {
                    name: name.to_string(),
                    id: None,
                    file: None,
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::PT_BR;

    fn read(body: &str) -> Vec<DatasetRef> {
        let html = format!(
            r#"<table><tr><td><a name="D001"></a>
                 <table><tr><td>DOCUMENT DEFINITION</td></tr></table>
                 <table>{body}</table>
               </td></tr></table>"#
        );
        let doc = DocumentTree::from_html(&html);
        let section = doc.closest(doc.anchor("D001").unwrap(), "tr").unwrap();
        read_report_datasets(&doc, section, &PT_BR)
    }

    #[test]
    fn test_linked_datasets_in_order_without_duplicates() {
        let datasets = read(
            r#"<tr><td><a href="CuboInteligente.html#[$$$$0A$$$$]">Vendas</a></td></tr>
               <tr><td><a href="Relatório.html#[$$$$0B$$$$]">Metas</a></td></tr>
               <tr><td><a href="CuboInteligente.html#[$$$$0A$$$$]">Vendas</a></td></tr>"#,
        );
        let names: Vec<_> = datasets.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Vendas", "Metas"]);
        assert_eq!(datasets[1].id.as_ref().unwrap().as_str(), "0B");
        assert_eq!(datasets[1].file.as_ref().unwrap().file, "Relatório.html");
    }

    #[test]
    fn test_datasets_row_fallback() {
        let datasets = read("<tr><td>Datasets:</td><td>Vendas, Metas ,</td></tr>");
        let names: Vec<_> = datasets.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Vendas", "Metas"]);
        assert!(datasets.iter().all(|d| d.id.is_none()));
    }

    #[test]
    fn test_no_definition_block() {
        let doc = DocumentTree::from_html(r#"<table><tr><td><a name="D001"></a>x</td></tr></table>"#);
        let section = doc.closest(doc.anchor("D001").unwrap(), "tr").unwrap();
        assert!(read_report_datasets(&doc, section, &PT_BR).is_empty());
    }
}
