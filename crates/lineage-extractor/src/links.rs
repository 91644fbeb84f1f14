//! Hyperlinks and the placeholder-encoded ids inside them
//!
//! Cross-document links carry the target id as `[$$$$HEX$$$$]` somewhere in
//! the href, e.g. `Métrica.html#[$$$$8D67...A4$$$$]`.

use lineage_document::{DocumentTree, NodeId};
use lineage_domain::{FileRef, ObjectId};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static PLACEHOLDER_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[\$\$\$\$([0-9A-F]+)\$\$\$\$\]").expect("placeholder pattern is valid")
});

/// Marker every placeholder-encoded href contains
pub const PLACEHOLDER_MARK: &str = "$$$$";

/// Id embedded in an href as `[$$$$HEX$$$$]`
pub fn placeholder_id(href: &str) -> Option<ObjectId> {
    PLACEHOLDER_ID
        .captures(href)
        .and_then(|c| c.get(1))
        .and_then(|m| ObjectId::parse(m.as_str()).ok())
}

/// Placeholder id, else the anchor when it is itself a hex id
pub fn href_id(href: &str) -> Option<ObjectId> {
    placeholder_id(href).or_else(|| {
        href.split_once('#')
            .and_then(|(_, anchor)| ObjectId::parse(anchor).ok())
    })
}

/// A hyperlink found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocLink {
    /// The `<a>` element
    pub node: NodeId,
    /// Visible text
    pub text: String,
    /// Raw href
    pub href: String,
    /// Target id, when the href encodes one
    pub id: Option<ObjectId>,
}

impl DocLink {
    /// Read the link at `node`, if it is an `<a href>`
    pub fn at(doc: &DocumentTree, node: NodeId) -> Option<Self> {
        if !doc.is_tag(node, "a") {
            return None;
        }
        let href = doc.attr(node, "href")?.trim().to_string();
        Some(Self {
            node,
            text: doc.text(node),
            id: href_id(&href),
            href,
        })
    }

    /// Defining-file reference parsed from the href
    pub fn file_ref(&self) -> Option<FileRef> {
        FileRef::from_href(&self.href)
    }

    /// Whether the href carries a placeholder-encoded id
    pub fn has_placeholder(&self) -> bool {
        self.href.contains(PLACEHOLDER_MARK)
    }
}

/// Every `<a href>` below `root`, in document order
pub fn links_in(doc: &DocumentTree, root: NodeId) -> Vec<DocLink> {
    doc.find_all(root, "a")
        .filter_map(|n| DocLink::at(doc, n))
        .collect()
}

/// Links below `root` whose href encodes an object id
pub fn object_links_in(doc: &DocumentTree, root: NodeId) -> Vec<DocLink> {
    links_in(doc, root)
        .into_iter()
        .filter(|l| l.has_placeholder() && l.id.is_some())
        .collect()
}

/// Drop links whose id was already seen, keeping the first occurrence
///
/// Links without an id are kept as they are.
pub fn dedup_by_id(links: Vec<DocLink>) -> Vec<DocLink> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|l| match &l.id {
            Some(id) => seen.insert(id.clone()),
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_id() {
        let id = placeholder_id("Métrica.html#[$$$$8d679d3711d3e4981000e787ec6de8a4$$$$]").unwrap();
        assert_eq!(id.as_str(), "8D679D3711D3E4981000E787EC6DE8A4");
        assert!(placeholder_id("Métrica.html#8D67").is_none());
    }

    #[test]
    fn test_href_id_falls_back_to_anchor() {
        assert_eq!(href_id("Documento.html#ABCD").unwrap().as_str(), "ABCD");
        assert!(href_id("Documento.html#top").is_none());
        assert!(href_id("Documento.html").is_none());
    }

    #[test]
    fn test_links_and_dedup() {
        let doc = DocumentTree::from_html(
            r#"<td>
                <a href="Atributo.html#[$$$$AA$$$$]">Mês</a>
                <a href="Atributo.html#[$$$$BB$$$$]">Ano</a>
                <a href="Atributo.html#[$$$$aa$$$$]">Mês again</a>
                <a href="Pasta.html#CC">Folder</a>
                <a name="no-href"></a>
              </td>"#,
        );
        let all = links_in(&doc, doc.root());
        assert_eq!(all.len(), 4);

        let objects = object_links_in(&doc, doc.root());
        assert_eq!(objects.len(), 3);

        let unique = dedup_by_id(objects);
        let names: Vec<_> = unique.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(names, vec!["Mês", "Ano"]);
        assert_eq!(unique[0].file_ref().unwrap().file, "Atributo.html");
    }
}
