//! Attribute forms

use super::fact::{expression_rows, Expression};
use super::find_section_header;
use crate::locale::Locale;
use lineage_document::{DocumentTree, NodeId};
use std::collections::HashSet;

/// A form as printed in the attribute's form details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFields {
    /// Form name
    pub name: String,
    /// Expression rows (column and source tables)
    pub expressions: Vec<Expression>,
}

/// Read the forms of an attribute section
///
/// Each `<a name>` containing `_` after the form-details header opens a form.
/// The table after it holds the name, the table after that the properties
/// with a nested expression table. Forms with a repeated name are dropped,
/// since their derived ids would collide.
pub fn read_attribute_forms(doc: &DocumentTree, section: NodeId, locale: &Locale) -> Vec<FormFields> {
    let Some(header) = find_section_header(doc, section, locale.sections.attribute_forms) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    doc.after(header)
        .take_while(|n| doc.contains(section, *n))
        .filter(|n| {
            doc.is_tag(*n, "a")
                && doc
                    .attr(*n, "name")
                    .map(|name| name.contains('_'))
                    .unwrap_or(false)
        })
        .filter_map(|anchor| read_form(doc, anchor, section, locale))
        .filter(|form| seen.insert(form.name.clone()))
        .collect()
}

fn read_form(doc: &DocumentTree, anchor: NodeId, section: NodeId, locale: &Locale) -> Option<FormFields> {
    let name_table = doc.next_tag_after_within(anchor, "table", section)?;
    let name_cell = doc.find_all(name_table, "td").next()?;
    let name = match doc.find_all(name_cell, "b").next() {
        Some(bold) => doc.text(bold),
        None => doc.text(name_cell),
    };
    if name.is_empty() {
        return None;
    }

    let expressions = doc
        .next_tag_after_within(name_table, "table", section)
        .map(|props| expression_rows(doc, doc.descendants(props), locale))
        .unwrap_or_default();

    Some(FormFields { name, expressions })
}
