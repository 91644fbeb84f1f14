//! Owned, navigable document tree
//!
//! Parsed HTML is flattened into an arena in document (pre-)order. Every node
//! records the index one past its last descendant, so "inside this section"
//! and "after this element" are plain index ranges. The tree owns all of its
//! strings, which makes it `Send + Sync` and cheap to share behind an `Arc`.

use scraper::{Html, Node as HtmlNode};
use std::collections::HashMap;

/// Index of a node inside a [`DocumentTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in document order
    pub fn index(self) -> usize {
        self.0
    }
}

/// An element's tag name and attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    name: String,
    attrs: Vec<(String, String)>,
}

impl ElementData {
    /// Lower-case tag name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value by (case-insensitive) name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the `class` attribute lists the given class (case-insensitive)
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|v| v.split_whitespace().any(|c| c.eq_ignore_ascii_case(class)))
            .unwrap_or(false)
    }
}

/// Node payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// The document root
    Document,
    /// An element
    Element(ElementData),
    /// A text run
    Text(String),
    /// A comment, without its `<!--` `-->` delimiters
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    end: usize,
}

/// A parsed document
#[derive(Debug, Clone)]
pub struct DocumentTree {
    nodes: Vec<Node>,
    anchors: HashMap<String, NodeId>,
    encoding: &'static str,
}

impl DocumentTree {
    /// Parse an HTML string
    ///
    /// # Examples
    ///
    /// ```
    /// use lineage_document::DocumentTree;
    ///
    /// let doc = DocumentTree::from_html("<table><tr><td><a name='AB'></a>Hi</td></tr></table>");
    /// let anchor = doc.anchor("ab").unwrap();
    /// assert!(doc.is_tag(anchor, "a"));
    /// ```
    pub fn from_html(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let mut nodes: Vec<Node> = Vec::new();
        let mut anchors = HashMap::new();
        let mut stack = vec![(parsed.tree.root(), None::<NodeId>)];

        while let Some((node_ref, parent)) = stack.pop() {
            let data = match node_ref.value() {
                HtmlNode::Document | HtmlNode::Fragment => NodeData::Document,
                HtmlNode::Element(element) => NodeData::Element(ElementData {
                    name: element.name().to_ascii_lowercase(),
                    attrs: element
                        .attrs()
                        .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
                        .collect(),
                }),
                HtmlNode::Text(text) => NodeData::Text(String::from(&**text)),
                HtmlNode::Comment(comment) => NodeData::Comment(String::from(&**comment)),
                _ => continue,
            };

            let id = NodeId(nodes.len());
            if let NodeData::Element(element) = &data {
                if element.name == "a" {
                    if let Some(name) = element.attr("name") {
                        anchors.entry(name.trim().to_uppercase()).or_insert(id);
                    }
                }
            }
            nodes.push(Node {
                data,
                parent,
                children: Vec::new(),
                end: 0,
            });
            if let Some(parent) = parent {
                nodes[parent.0].children.push(id);
            }

            let children: Vec<_> = node_ref.children().collect();
            for child in children.into_iter().rev() {
                stack.push((child, Some(id)));
            }
        }

        for i in (0..nodes.len()).rev() {
            let end = match nodes[i].children.last() {
                Some(last) => nodes[last.0].end,
                None => i + 1,
            };
            nodes[i].end = end;
        }

        Self {
            nodes,
            anchors,
            encoding: "UTF-8",
        }
    }

    /// Record which encoding the source was decoded with
    pub fn with_encoding(mut self, encoding: &'static str) -> Self {
        self.encoding = encoding;
        self
    }

    /// Encoding the source was decoded with
    pub fn encoding(&self) -> &'static str {
        self.encoding
    }

    /// The document root
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node payload
    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    /// Element payload, if the node is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes[id.0].data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Whether the node is an element with the given tag
    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.element(id).map(|e| e.name == tag).unwrap_or(false)
    }

    /// Attribute of an element node
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.attr(name))
    }

    /// Comment text, if the node is a comment
    pub fn comment(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Comment(text) => Some(text),
            _ => None,
        }
    }

    /// First `<a name=...>` with the given name, case-insensitive
    pub fn anchor(&self, name: &str) -> Option<NodeId> {
        self.anchors.get(&name.trim().to_uppercase()).copied()
    }

    /// Parent node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Direct children
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Direct element children with the given tag
    pub fn child_elements<'a>(
        &'a self,
        id: NodeId,
        tag: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(id)
            .iter()
            .copied()
            .filter(move |c| self.is_tag(*c, tag))
    }

    /// Ancestors from the parent up to the root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |p| self.parent(*p))
    }

    /// Nearest ancestor with the given tag
    pub fn closest(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.ancestors(id).find(|a| self.is_tag(*a, tag))
    }

    /// All descendants in document order, excluding the node itself
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> {
        (id.0 + 1..self.nodes[id.0].end).map(NodeId)
    }

    /// Descendant elements with the given tag
    pub fn find_all<'a>(&'a self, id: NodeId, tag: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.descendants(id).filter(move |d| self.is_tag(*d, tag))
    }

    /// Everything after this node in document order, descendants included
    pub fn following(&self, id: NodeId) -> impl Iterator<Item = NodeId> {
        (id.0 + 1..self.nodes.len()).map(NodeId)
    }

    /// Everything after this node's subtree in document order
    pub fn after(&self, id: NodeId) -> impl Iterator<Item = NodeId> {
        (self.nodes[id.0].end..self.nodes.len()).map(NodeId)
    }

    /// Whether `node` lies inside the subtree rooted at `ancestor`
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node.0 > ancestor.0 && node.0 < self.nodes[ancestor.0].end
    }

    /// First element with `tag` after `id` (document order), staying within `bound`
    pub fn next_tag_within(&self, id: NodeId, tag: &str, bound: NodeId) -> Option<NodeId> {
        self.following(id)
            .take_while(|n| self.contains(bound, *n))
            .find(|n| self.is_tag(*n, tag))
    }

    /// First element with `tag` after the subtree of `id`, staying within `bound`
    pub fn next_tag_after_within(&self, id: NodeId, tag: &str, bound: NodeId) -> Option<NodeId> {
        self.after(id)
            .take_while(|n| self.contains(bound, *n))
            .find(|n| self.is_tag(*n, tag))
    }

    /// Visible text with each run trimmed and runs joined by single spaces
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        for run in self.text_runs(id) {
            let run = run.split_whitespace().collect::<Vec<_>>().join(" ");
            if run.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&run);
        }
        out
    }

    /// Visible text exactly as written, runs concatenated
    pub fn raw_text(&self, id: NodeId) -> String {
        self.text_runs(id).collect()
    }

    fn text_runs(&self, id: NodeId) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(id)
            .chain(self.descendants(id))
            .filter_map(move |n| match &self.nodes[n.0].data {
                NodeData::Text(text) => Some(text.as_str()),
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <html><body>
        <table class="outer">
          <tr><td><a name="AAA"></a><b>First</b> object</td></tr>
          <tr><td><a name="bbb"></a>Second <i>object</i>
              <table><tr><td>nested</td></tr></table></td></tr>
        </table>
        <!-- [OBJECT: Legacy] -->
        <p>tail</p>
        </body></html>"#;

    #[test]
    fn test_anchor_lookup_is_case_insensitive() {
        let doc = DocumentTree::from_html(SAMPLE);
        assert!(doc.anchor("aaa").is_some());
        assert!(doc.anchor("BBB").is_some());
        assert!(doc.anchor("CCC").is_none());
    }

    #[test]
    fn test_closest_row_and_text() {
        let doc = DocumentTree::from_html(SAMPLE);
        let anchor = doc.anchor("AAA").unwrap();
        let row = doc.closest(anchor, "tr").unwrap();
        assert_eq!(doc.text(row), "First object");
    }

    #[test]
    fn test_subtree_ranges() {
        let doc = DocumentTree::from_html(SAMPLE);
        let second = doc.closest(doc.anchor("BBB").unwrap(), "tr").unwrap();
        let nested: Vec<_> = doc.find_all(second, "table").collect();
        assert_eq!(nested.len(), 1);
        assert!(doc.contains(second, nested[0]));

        let first = doc.closest(doc.anchor("AAA").unwrap(), "tr").unwrap();
        assert!(!doc.contains(first, nested[0]));
        assert_eq!(doc.next_tag_after_within(first, "tr", doc.root()), Some(second));
    }

    #[test]
    fn test_comments_are_kept_but_not_text() {
        let doc = DocumentTree::from_html(SAMPLE);
        let comment = doc
            .descendants(doc.root())
            .find_map(|n| doc.comment(n))
            .unwrap();
        assert!(comment.contains("[OBJECT: Legacy]"));
        assert!(!doc.text(doc.root()).contains("OBJECT"));
    }

    #[test]
    fn test_every_node_kind_is_flattened() {
        let doc = DocumentTree::from_html("<!DOCTYPE html><p>one<!-- two --></p>");
        assert_eq!(doc.data(doc.root()), &NodeData::Document);

        let kinds: Vec<_> = doc
            .descendants(doc.root())
            .map(|n| match doc.data(n) {
                NodeData::Document => "document",
                NodeData::Element(_) => "element",
                NodeData::Text(_) => "text",
                NodeData::Comment(_) => "comment",
            })
            .collect();
        assert!(!kinds.contains(&"document"));
        assert!(kinds.contains(&"text"));
        assert!(kinds.contains(&"comment"));

        let p = doc.find_all(doc.root(), "p").next().unwrap();
        assert_eq!(doc.text(p), "one");
        let children: Vec<_> = doc.children(p).iter().map(|c| doc.data(*c).clone()).collect();
        assert_eq!(
            children,
            vec![
                NodeData::Text("one".to_string()),
                NodeData::Comment(" two ".to_string())
            ]
        );
    }

    #[test]
    fn test_preorder_end_indices_are_consistent() {
        let doc = DocumentTree::from_html(SAMPLE);
        for i in 0..doc.len() {
            let id = NodeId(i);
            for child in doc.children(id) {
                assert!(doc.contains(id, *child));
                assert_eq!(doc.parent(*child), Some(id));
            }
        }
    }

    #[test]
    fn test_attributes_and_classes() {
        let doc = DocumentTree::from_html(
            r#"<a class="Foo MAINBODY" HREF="Metric.html#AB">Receita</a>"#,
        );
        let link = doc.find_all(doc.root(), "a").next().unwrap();
        assert_eq!(doc.attr(link, "href"), Some("Metric.html#AB"));
        assert!(doc.element(link).unwrap().has_class("mainbody"));
        assert_eq!(doc.raw_text(link), "Receita");
    }
}
