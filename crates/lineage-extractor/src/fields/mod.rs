//! Field extractors - read one object's fields out of its located section
//!
//! Extractors are pure functions over a [`DocumentTree`] and a section root.
//! They return ids and names exactly as the page prints them; resolving those
//! against the indexes is the builder's job.

pub mod attribute;
pub mod dataset;
pub mod fact;
pub mod metric;
pub mod report;

use crate::normalize::{contains_folded, fold_upper};
use lineage_document::{DocumentTree, NodeId};

/// Class of the title tables that split an object into blocks
pub const SECTION_HEADER_CLASS: &str = "SECTIONHEADER";

/// Whether the node is a `<table class="SECTIONHEADER">`
pub fn is_section_header(doc: &DocumentTree, node: NodeId) -> bool {
    doc.is_tag(node, "table")
        && doc
            .element(node)
            .map(|e| e.has_class(SECTION_HEADER_CLASS))
            .unwrap_or(false)
}

/// First section header inside `scope` whose text contains `title`
pub fn find_section_header(doc: &DocumentTree, scope: NodeId, title: &str) -> Option<NodeId> {
    doc.descendants(scope)
        .find(|n| is_section_header(doc, *n) && contains_folded(&doc.text(*n), title))
}

/// Nodes after `header` up to the next section header, staying inside `scope`
pub fn block_after(doc: &DocumentTree, header: NodeId, scope: NodeId) -> Vec<NodeId> {
    doc.after(header)
        .take_while(|n| doc.contains(scope, *n) && !is_section_header(doc, *n))
        .collect()
}

/// The block under the titled header, or the whole section when the header
/// is absent
pub fn titled_block(doc: &DocumentTree, scope: NodeId, title: &str) -> Vec<NodeId> {
    match find_section_header(doc, scope, title) {
        Some(header) => block_after(doc, header, scope),
        None => doc.descendants(scope).collect(),
    }
}

/// Innermost `td` inside `scope` whose text contains `text`
pub fn find_cell(doc: &DocumentTree, scope: NodeId, text: &str) -> Option<NodeId> {
    doc.find_all(scope, "td").find(|td| {
        doc.find_all(*td, "td").next().is_none() && contains_folded(&doc.text(*td), text)
    })
}

/// Direct `td`/`th` cells of a row
pub fn row_cells(doc: &DocumentTree, row: NodeId) -> Vec<NodeId> {
    doc.children(row)
        .iter()
        .copied()
        .filter(|c| doc.is_tag(*c, "td") || doc.is_tag(*c, "th"))
        .collect()
}

/// Value cell of the first label/value row whose label contains `label`
///
/// Rows whose label cell wraps a nested table are layout rows and skipped.
pub fn labeled_value(doc: &DocumentTree, nodes: &[NodeId], label: &str) -> Option<NodeId> {
    nodes
        .iter()
        .copied()
        .filter(|n| doc.is_tag(*n, "tr"))
        .find_map(|row| {
            let cells = row_cells(doc, row);
            if cells.len() < 2 || doc.find_all(cells[0], "table").next().is_some() {
                return None;
            }
            contains_folded(&doc.text(cells[0]), label).then_some(cells[1])
        })
}

/// Folded upper-case text of each cell in a header row
pub fn header_texts(doc: &DocumentTree, row: NodeId) -> Vec<String> {
    row_cells(doc, row)
        .into_iter()
        .map(|c| fold_upper(&doc.text(c)))
        .collect()
}

/// Index of the first header containing `name`
pub fn column_index(headers: &[String], name: &str) -> Option<usize> {
    let name = fold_upper(name);
    headers.iter().position(|h| h.contains(&name))
}

/// Lower-cased `src` of the last `<img>` before `node` inside `scope`
pub fn preceding_icon(doc: &DocumentTree, node: NodeId, scope: NodeId) -> Option<String> {
    doc.descendants(scope)
        .take_while(|n| *n < node)
        .filter(|n| doc.is_tag(*n, "img"))
        .last()
        .and_then(|img| doc.attr(img, "src"))
        .map(|s| s.to_lowercase())
}
