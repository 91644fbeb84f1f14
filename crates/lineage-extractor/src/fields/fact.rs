//! Fact expressions and the expression tables shared with attribute forms

use super::{column_index, header_texts, row_cells, titled_block};
use crate::links::{object_links_in, DocLink};
use crate::locale::Locale;
use lineage_document::{DocumentTree, NodeId};
use std::collections::HashSet;

/// One row of an expression table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    /// Column (or expression) text
    pub column: String,
    /// Source table links
    pub tables: Vec<DocLink>,
}

/// First header row among `nodes` naming both the expression and source
/// tables columns, with their indexes
fn expression_header(
    doc: &DocumentTree,
    nodes: impl IntoIterator<Item = NodeId>,
    locale: &Locale,
) -> Option<(NodeId, usize, usize)> {
    nodes
        .into_iter()
        .filter(|n| doc.is_tag(*n, "tr"))
        .filter(|row| {
            row_cells(doc, *row)
                .iter()
                .all(|c| doc.find_all(*c, "table").next().is_none())
        })
        .find_map(|row| {
            let headers = header_texts(doc, row);
            let expression = column_index(&headers, locale.headers.expression)?;
            let tables = column_index(&headers, locale.headers.source_tables)?;
            Some((row, expression, tables))
        })
}

/// Data rows following an expression header row
pub fn expression_rows(
    doc: &DocumentTree,
    nodes: impl IntoIterator<Item = NodeId>,
    locale: &Locale,
) -> Vec<Expression> {
    let Some((header, expression_col, tables_col)) = expression_header(doc, nodes, locale) else {
        return Vec::new();
    };
    let Some(body) = doc.parent(header) else {
        return Vec::new();
    };

    doc.child_elements(body, "tr")
        .filter(|row| *row > header)
        .filter_map(|row| {
            let cells = row_cells(doc, row);
            let column = doc.text(*cells.get(expression_col)?);
            let tables = object_links_in(doc, *cells.get(tables_col)?);
            if column.is_empty() && tables.is_empty() {
                return None;
            }
            Some(Expression { column, tables })
        })
        .collect()
}

/// Read a fact's expressions
///
/// A table listed under several expressions keeps only its first
/// occurrence, so the result is one entry per distinct source table.
pub fn read_fact(doc: &DocumentTree, section: NodeId, locale: &Locale) -> Vec<Expression> {
    let block = titled_block(doc, section, locale.sections.expressions);
    let mut seen = HashSet::new();

    expression_rows(doc, block, locale)
        .into_iter()
        .map(|mut expression| {
            expression.tables.retain(|t| match &t.id {
                Some(id) => seen.insert(id.clone()),
                None => false,
            });
            expression
        })
        .filter(|e| !e.tables.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::PT_BR;

    const FACT: &str = r#"
        <table><tr><td><a name="FA01"></a>
          <table class="SECTIONHEADER"><tr><td>EXPRESSÕES</td></tr></table>
          <table>
            <tr><td>EXPRESSÃO</td><td>MAPEAMENTO</td><td>TABELAS FONTE</td></tr>
            <tr><td>VL_RECEITA</td><td>Automático</td><td>
                <a href="TabelaLógica.html#[$$$$0A$$$$]">FT_VENDAS</a>
                <a href="TabelaLógica.html#[$$$$0B$$$$]">FT_VENDAS_MES</a></td></tr>
            <tr><td>VL_REC * 1</td><td>Manual</td><td>
                <a href="TabelaLógica.html#[$$$$0A$$$$]">FT_VENDAS</a>
                <a href="TabelaLógica.html#[$$$$0C$$$$]">AG_VENDAS</a></td></tr>
          </table>
        </td></tr></table>"#;

    #[test]
    fn test_fact_expressions() {
        let doc = DocumentTree::from_html(FACT);
        let section = doc.closest(doc.anchor("FA01").unwrap(), "tr").unwrap();
        let expressions = read_fact(&doc, section, &PT_BR);

        assert_eq!(expressions.len(), 2);
        assert_eq!(expressions[0].column, "VL_RECEITA");
        assert_eq!(expressions[0].tables.len(), 2);
        assert_eq!(expressions[1].column, "VL_REC * 1");
        let names: Vec<_> = expressions[1].tables.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(names, vec!["AG_VENDAS"]);
    }

    #[test]
    fn test_no_expression_table() {
        let doc = DocumentTree::from_html(
            r#"<table><tr><td><a name="FA01"></a>nothing here</td></tr></table>"#,
        );
        let section = doc.closest(doc.anchor("FA01").unwrap(), "tr").unwrap();
        assert!(read_fact(&doc, section, &PT_BR).is_empty());
    }
}
