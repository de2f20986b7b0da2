//! Arena-backed parse tree.
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`]. Each
//! node has a link to its first child and to its next sibling, which makes the
//! arena a multiway tree without owning pointers:
//!
//! ```text
//! <div>            div ─────────▶ p
//!   <b>x</b>        │             │
//!   <i></i>         b ──▶ i       @text "y"
//! </div>            │
//! <p>y</p>          @text "x"
//! ```
//!
//! Attributes are ordinary nodes chained under a synthetic `@attr` node, which
//! is always the first child of the element that owns them. Bare text is held
//! by synthetic `@text` nodes.

use crate::vocab::{ATTR_TAG, TEXT_TAG};
use std::fmt::Write;

/// Index of a node in a [`ParseTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What an arena slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// An element, including the `for`/`if` control tags.
    Element,
    /// A `@text` node.
    Text,
    /// An `@attr` node; its children are the element's attributes.
    AttrList,
    /// One attribute: tag is the name, text is the value.
    Attribute,
}

/// First-child link of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child {
    /// No children (yet).
    Empty,
    /// Index of the first child.
    First(NodeId),
    /// A void element: never has content children or a close tag. Carries the
    /// element's `@attr` node if it had attributes.
    Void(Option<NodeId>),
}

/// One slot of the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNode<'src> {
    pub kind: NodeKind,
    pub tag: &'src str,
    pub text: &'src str,
    pub id: Option<&'src str>,
    pub child: Child,
    pub sibling: Option<NodeId>,
}

impl<'src> ParseNode<'src> {
    fn new(kind: NodeKind, tag: &'src str, text: &'src str) -> Self {
        Self {
            kind,
            tag,
            text,
            id: None,
            child: Child::Empty,
            sibling: None,
        }
    }

    pub fn element(tag: &'src str) -> Self {
        Self::new(NodeKind::Element, tag, "")
    }

    pub fn text(text: &'src str) -> Self {
        Self::new(NodeKind::Text, TEXT_TAG, text)
    }

    pub fn attr_list() -> Self {
        Self::new(NodeKind::AttrList, ATTR_TAG, "")
    }

    pub fn attribute(name: &'src str, value: &'src str) -> Self {
        Self::new(NodeKind::Attribute, name, value)
    }

    pub fn is_void(&self) -> bool {
        matches!(self.child, Child::Void(_))
    }
}

/// A `name="value"` pair collected while parsing an open tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attr<'src> {
    pub name: &'src str,
    pub value: &'src str,
}

/// The parser's output tree. Node text borrows from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree<'src> {
    source: &'src str,
    nodes: Vec<ParseNode<'src>>,
    first: Option<NodeId>,
}

impl<'src> ParseTree<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            nodes: Vec::new(),
            first: None,
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[ParseNode<'src>] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> &ParseNode<'src> {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut ParseNode<'src> {
        &mut self.nodes[id.index()]
    }

    /// The first top-level node. The rest follow through its sibling chain.
    pub fn first(&self) -> Option<NodeId> {
        self.first
    }

    pub(crate) fn push(&mut self, node: ParseNode<'src>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Attach `child` after `prev` (its elder sibling), or as the first child
    /// of `parent` when it has no elder, or as the first top-level node.
    pub(crate) fn link(&mut self, parent: Option<NodeId>, prev: Option<NodeId>, child: NodeId) {
        match (prev, parent) {
            (Some(prev), _) => self.node_mut(prev).sibling = Some(child),
            (None, Some(parent)) => self.node_mut(parent).child = Child::First(child),
            (None, None) => self.first = Some(child),
        }
    }

    /// Walk a sibling chain starting at `start`.
    pub fn siblings(&self, start: Option<NodeId>) -> Siblings<'_, 'src> {
        Siblings {
            tree: self,
            next: start,
        }
    }

    /// Top-level nodes in document order.
    pub fn roots(&self) -> Siblings<'_, 'src> {
        self.siblings(self.first)
    }

    /// The `@attr` node of an element, if it has attributes.
    pub fn attr_list(&self, id: NodeId) -> Option<NodeId> {
        let first = match self.node(id).child {
            Child::First(first) => first,
            Child::Void(attrs) => return attrs,
            Child::Empty => return None,
        };
        (self.node(first).kind == NodeKind::AttrList).then_some(first)
    }

    /// Attribute nodes of an element, in source order.
    pub fn attributes(&self, id: NodeId) -> Siblings<'_, 'src> {
        let first = self.attr_list(id).and_then(|list| match self.node(list).child {
            Child::First(first) => Some(first),
            _ => None,
        });
        self.siblings(first)
    }

    /// Content children of a node: everything after the `@attr` node.
    /// Void elements have none.
    pub fn content(&self, id: NodeId) -> Siblings<'_, 'src> {
        let start = match self.node(id).child {
            Child::First(first) if self.node(first).kind == NodeKind::AttrList => {
                self.node(first).sibling
            }
            Child::First(first) => Some(first),
            Child::Empty | Child::Void(_) => None,
        };
        self.siblings(start)
    }

    /// One line per arena slot, for debugging.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (i, node) in self.nodes.iter().enumerate() {
            let child = match node.child {
                Child::Empty => "-".to_string(),
                Child::First(id) => id.index().to_string(),
                Child::Void(Some(id)) => format!("void({})", id.index()),
                Child::Void(None) => "void".to_string(),
            };
            let sibling = node
                .sibling
                .map_or_else(|| "-".to_string(), |id| id.index().to_string());
            let _ = write!(out, "{i:>4} {:<9} {}", format!("{:?}", node.kind), node.tag);
            if !node.text.is_empty() {
                let _ = write!(out, " {:?}", node.text);
            }
            if let Some(id) = node.id {
                let _ = write!(out, " #{id}");
            }
            let _ = writeln!(out, " child={child} sibling={sibling}");
        }
        out
    }
}

/// Iterator over a sibling chain.
pub struct Siblings<'t, 'src> {
    tree: &'t ParseTree<'src>,
    next: Option<NodeId>,
}

impl<'t, 'src> Iterator for Siblings<'t, 'src> {
    type Item = (NodeId, &'t ParseNode<'src>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.tree.node(id);
        self.next = node.sibling;
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build `<div a="1"><p></p>hi</div><br>` by hand.
    fn sample() -> ParseTree<'static> {
        let mut tree = ParseTree::new("");
        let div = tree.push(ParseNode::element("div"));
        tree.link(None, None, div);

        let attrs = tree.push(ParseNode::attr_list());
        tree.link(Some(div), None, attrs);
        let a = tree.push(ParseNode::attribute("a", "1"));
        tree.link(Some(attrs), None, a);

        let p = tree.push(ParseNode::element("p"));
        tree.link(Some(div), Some(attrs), p);
        let text = tree.push(ParseNode::text("hi"));
        tree.link(Some(div), Some(p), text);

        let br = tree.push(ParseNode::element("br"));
        tree.node_mut(br).child = Child::Void(None);
        tree.link(None, Some(div), br);
        tree
    }

    fn tags<'a>(iter: Siblings<'a, 'static>) -> Vec<&'static str> {
        iter.map(|(_, n)| n.tag).collect()
    }

    #[test]
    fn test_empty_tree() {
        let tree = ParseTree::new("");
        assert!(tree.is_empty());
        assert_eq!(tree.first(), None);
        assert_eq!(tree.roots().count(), 0);
    }

    #[test]
    fn test_roots_follow_sibling_chain() {
        let tree = sample();
        assert_eq!(tags(tree.roots()), vec!["div", "br"]);
    }

    #[test]
    fn test_content_skips_attr_list() {
        let tree = sample();
        let div = tree.first().unwrap();
        assert_eq!(tags(tree.content(div)), vec!["p", "@text"]);
    }

    #[test]
    fn test_attributes() {
        let tree = sample();
        let div = tree.first().unwrap();
        let attrs: Vec<_> = tree
            .attributes(div)
            .map(|(_, n)| (n.tag, n.text))
            .collect();
        assert_eq!(attrs, vec![("a", "1")]);
    }

    #[test]
    fn test_void_has_no_content() {
        let tree = sample();
        let (br, node) = tree.roots().nth(1).unwrap();
        assert!(node.is_void());
        assert_eq!(tree.content(br).count(), 0);
        assert_eq!(tree.attributes(br).count(), 0);
    }

    #[test]
    fn test_dump_lists_every_slot() {
        let tree = sample();
        let dump = tree.dump();
        assert_eq!(dump.lines().count(), tree.len());
        assert!(dump.contains("@attr"));
        assert!(dump.contains("\"hi\""));
        assert!(dump.contains("child=void"));
    }
}
