//! Section locator - finds the subtree bounding one documented object
//!
//! The exporter writes one object per table row, introduced by an
//! `<a name="ID">` anchor. Older exports have no anchors and mark objects with
//! comments such as `<!-- [OBJECT: Receita] -->` instead.

use crate::{DocumentTree, NodeId};
use tracing::debug;

/// Comment prefix used by legacy exports
pub const DEFAULT_OBJECT_MARKER: &str = "[OBJECT:";

/// What to look for
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionKey<'a> {
    /// Anchor id, tried first
    pub anchor: Option<&'a str>,
    /// Object name, used for the comment-marker fallback
    pub name: Option<&'a str>,
}

impl<'a> SectionKey<'a> {
    /// Look up by anchor only
    pub fn anchor(anchor: &'a str) -> Self {
        Self {
            anchor: Some(anchor),
            name: None,
        }
    }

    /// Look up by anchor, falling back to the object name
    pub fn new(anchor: Option<&'a str>, name: Option<&'a str>) -> Self {
        Self { anchor, name }
    }
}

/// How a section was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateStrategy {
    /// Via `<a name>` and its enclosing row
    Anchor,
    /// Via a legacy `[OBJECT: name]` comment and its enclosing table
    CommentMarker,
}

/// A located section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    /// Root of the bounded subtree
    pub root: NodeId,
    /// Strategy that found it
    pub strategy: LocateStrategy,
}

/// Locates object sections inside documents
#[derive(Debug, Clone)]
pub struct SectionLocator {
    object_marker: String,
}

impl Default for SectionLocator {
    fn default() -> Self {
        Self::new(DEFAULT_OBJECT_MARKER)
    }
}

impl SectionLocator {
    /// Create a locator using the given comment prefix (e.g. `[OBJECT:`)
    pub fn new(object_marker: impl Into<String>) -> Self {
        Self {
            object_marker: object_marker.into(),
        }
    }

    /// Find the section for an object, or `None`
    ///
    /// # Examples
    ///
    /// ```
    /// use lineage_document::{DocumentTree, LocateStrategy, SectionKey, SectionLocator};
    ///
    /// let doc = DocumentTree::from_html(
    ///     "<table><tr><td><a name='AB12'></a>Receita</td></tr></table>",
    /// );
    /// let section = SectionLocator::default()
    ///     .locate(&doc, SectionKey::anchor("ab12"))
    ///     .unwrap();
    /// assert_eq!(section.strategy, LocateStrategy::Anchor);
    /// assert_eq!(doc.text(section.root), "Receita");
    /// ```
    pub fn locate(&self, doc: &DocumentTree, key: SectionKey<'_>) -> Option<Section> {
        if let Some(anchor) = key.anchor.filter(|a| !a.trim().is_empty()) {
            if let Some(root) = Self::by_anchor(doc, anchor) {
                return Some(Section {
                    root,
                    strategy: LocateStrategy::Anchor,
                });
            }
            debug!("Anchor {} has no enclosing row", anchor);
        }

        if let Some(name) = key.name.filter(|n| !n.trim().is_empty()) {
            if let Some(root) = self.by_comment(doc, name.trim()) {
                return Some(Section {
                    root,
                    strategy: LocateStrategy::CommentMarker,
                });
            }
        }

        None
    }

    fn by_anchor(doc: &DocumentTree, anchor: &str) -> Option<NodeId> {
        let node = doc.anchor(anchor)?;
        doc.closest(node, "tr")
    }

    fn by_comment(&self, doc: &DocumentTree, name: &str) -> Option<NodeId> {
        let closed = format!("{} {}]", self.object_marker, name);
        let open = format!("{} {} ", self.object_marker, name);

        let marker = doc.descendants(doc.root()).find(|n| {
            doc.comment(*n)
                .map(|c| c.contains(&closed) || c.contains(&open))
                .unwrap_or(false)
        })?;

        let table = doc.closest(marker, "table")?;
        Some(doc.closest(table, "table").unwrap_or(table))
    }
}
