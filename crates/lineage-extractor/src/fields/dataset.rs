//! Dataset contents: which attributes and metrics a dataset shows
//!
//! Cubes print a template-objects table; reports used as datasets print
//! `[ROWS]` and `[COLUMNS]` comment blocks and may carry chart options.

use super::{column_index, find_cell, header_texts, labeled_value};
use crate::links::{dedup_by_id, object_links_in, DocLink};
use crate::locale::Locale;
use lineage_document::{DocumentTree, NodeId};
use tracing::debug;

/// Chart type values outside this length range are layout noise
const CHART_TYPE_LEN: std::ops::Range<usize> = 4..50;

/// Attribute and metric links of a dataset, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetObjects {
    /// Attribute links (rows)
    pub attributes: Vec<DocLink>,
    /// Metric links (columns)
    pub metrics: Vec<DocLink>,
}

impl DatasetObjects {
    /// Whether neither list has entries
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.metrics.is_empty()
    }
}

/// Whether the section shows the view-report icon of an ad-hoc report
pub fn is_view_report(doc: &DocumentTree, section: NodeId, locale: &Locale) -> bool {
    doc.find_all(section, "img").any(|img| {
        doc.attr(img, "src")
            .map(|src| src.to_lowercase().contains(locale.icons.view_report))
            .unwrap_or(false)
    })
}

/// Links of the first `td` after a comment containing `marker`
fn marked_cell_links(doc: &DocumentTree, section: NodeId, marker: &str) -> Option<Vec<DocLink>> {
    let comment = doc
        .descendants(section)
        .find(|n| doc.comment(*n).map(|c| c.contains(marker)).unwrap_or(false))?;
    let links = doc
        .next_tag_within(comment, "td", section)
        .map(|td| dedup_by_id(object_links_in(doc, td)))
        .unwrap_or_default();
    Some(links)
}

/// Read an ad-hoc report's `[ROWS]` and `[COLUMNS]` blocks
///
/// Returns `None` when neither marker is present.
pub fn read_rows_columns(doc: &DocumentTree, section: NodeId, locale: &Locale) -> Option<DatasetObjects> {
    let rows = marked_cell_links(doc, section, locale.markers.rows);
    let columns = marked_cell_links(doc, section, locale.markers.columns);
    if rows.is_none() && columns.is_none() {
        return None;
    }
    Some(DatasetObjects {
        attributes: rows.unwrap_or_default(),
        metrics: columns.unwrap_or_default(),
    })
}

/// Read a cube's template-objects table
///
/// The table is the first of the `window` tables after the template-objects
/// title whose first row names the report objects, rows and columns headers.
/// The row after it holds the attribute and metric links.
pub fn read_template_objects(
    doc: &DocumentTree,
    section: NodeId,
    locale: &Locale,
    window: usize,
) -> DatasetObjects {
    let Some(title) = find_cell(doc, section, locale.sections.template_objects) else {
        debug!("No template objects block in section");
        return DatasetObjects::default();
    };

    let headers = &locale.headers;
    let found = doc
        .after(title)
        .take_while(|n| doc.contains(section, *n))
        .filter(|n| doc.is_tag(*n, "table"))
        .take(window)
        .find_map(|table| {
            let header = doc.find_all(table, "tr").next()?;
            let texts = header_texts(doc, header);
            column_index(&texts, headers.report_objects)?;
            let rows = column_index(&texts, headers.rows)?;
            let columns = column_index(&texts, headers.columns)?;
            Some((header, rows, columns))
        });

    let Some((header, rows_col, columns_col)) = found else {
        debug!("No template table within {} tables of the title", window);
        return DatasetObjects::default();
    };
    let Some(data) = doc.parent(header).and_then(|body| {
        doc.child_elements(body, "tr").find(|row| *row > header)
    }) else {
        return DatasetObjects::default();
    };

    let cells: Vec<_> = doc.child_elements(data, "td").collect();
    let links_at = |col: usize| {
        cells
            .get(col)
            .map(|cell| dedup_by_id(object_links_in(doc, *cell)))
            .unwrap_or_default()
    };
    DatasetObjects {
        attributes: links_at(rows_col),
        metrics: links_at(columns_col),
    }
}

/// Chart type from the chart-options block, if any
pub fn read_chart_type(doc: &DocumentTree, section: NodeId, locale: &Locale) -> Option<String> {
    let title = find_cell(doc, section, locale.sections.chart_options)?;
    let block: Vec<_> = doc
        .after(title)
        .take_while(|n| doc.contains(section, *n))
        .collect();
    let value = doc.text(labeled_value(doc, &block, locale.headers.chart_type)?);
    CHART_TYPE_LEN
        .contains(&value.chars().count())
        .then_some(value)
}
