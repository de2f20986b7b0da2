//! Runtime tree.
//!
//! The parse arena is turned into an owning tree once, before any rendering.
//! Attribute chains are folded into a sorted dictionary and all text is
//! pre-scanned, so rendering only walks segments.

use std::collections::{BTreeMap, BTreeSet};
use tessera_lexer::TemplateText;
use tessera_parser::tree::{NodeId, NodeKind, ParseTree};
use tessera_parser::vocab::{FOR_TAG, IF_TAG};

use crate::function::parse_call;

/// How a runtime node renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeKind {
    /// Synthetic parent of the top-level nodes.
    Root,
    Element,
    Text,
    If,
    For,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeNode<'src> {
    pub kind: RuntimeKind,
    pub tag: &'src str,
    pub id: Option<TemplateText<'src>>,
    pub void: bool,
    pub attrs: BTreeMap<&'src str, TemplateText<'src>>,
    pub text: TemplateText<'src>,
    pub children: Vec<RuntimeNode<'src>>,
}

impl<'src> RuntimeNode<'src> {
    pub fn new(kind: RuntimeKind, tag: &'src str) -> Self {
        Self {
            kind,
            tag,
            id: None,
            void: false,
            attrs: BTreeMap::new(),
            text: TemplateText::default(),
            children: Vec::new(),
        }
    }

    /// Attribute lookup, ignoring ASCII case.
    pub fn attr(&self, name: &str) -> Option<&TemplateText<'src>> {
        self.attrs
            .get(name)
            .or_else(|| {
                self.attrs
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v)
            })
    }

    /// Every template text in this subtree: node text, id and attribute
    /// values.
    fn walk_text<'a>(&'a self, visit: &mut impl FnMut(&'a TemplateText<'src>)) {
        visit(&self.text);
        if let Some(id) = &self.id {
            visit(id);
        }
        for value in self.attrs.values() {
            visit(value);
        }
        for child in &self.children {
            child.walk_text(visit);
        }
    }

    /// Keys looked up in the context, sorted. Function calls are excluded.
    pub fn placeholder_keys(&self) -> BTreeSet<&'src str> {
        let mut keys = BTreeSet::new();
        self.walk_text(&mut |text: &TemplateText<'src>| {
            keys.extend(text.keys().filter(|key| parse_call(key).is_none()));
        });
        keys
    }

    /// Names of the extension functions called, sorted.
    pub fn function_names(&self) -> BTreeSet<&'src str> {
        let mut names = BTreeSet::new();
        self.walk_text(&mut |text: &TemplateText<'src>| {
            names.extend(text.keys().filter_map(|key| parse_call(key).map(|(name, _)| name)));
        });
        names
    }
}

/// Build the runtime tree for a parsed document.
pub fn build<'src>(tree: &ParseTree<'src>) -> RuntimeNode<'src> {
    let mut root = RuntimeNode::new(RuntimeKind::Root, "");
    root.children = tree.roots().map(|(id, _)| build_node(tree, id)).collect();
    root
}

fn build_node<'src>(tree: &ParseTree<'src>, id: NodeId) -> RuntimeNode<'src> {
    let node = tree.node(id);
    let kind = match node.kind {
        NodeKind::Text => RuntimeKind::Text,
        _ if node.tag.eq_ignore_ascii_case(FOR_TAG) => RuntimeKind::For,
        _ if node.tag.eq_ignore_ascii_case(IF_TAG) => RuntimeKind::If,
        _ => RuntimeKind::Element,
    };

    RuntimeNode {
        kind,
        tag: node.tag,
        id: node.id.map(TemplateText::scan),
        void: node.is_void(),
        attrs: tree
            .attributes(id)
            .map(|(_, attr)| (attr.tag, TemplateText::scan(attr.text)))
            .collect(),
        text: TemplateText::scan(node.text),
        children: tree
            .content(id)
            .map(|(child, _)| build_node(tree, child))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tessera_parser::Parser;

    fn build_source(source: &str) -> RuntimeNode<'_> {
        let tree = Parser::parse(source).into_result().unwrap();
        build(&tree)
    }

    fn kinds(node: &RuntimeNode<'_>) -> Vec<RuntimeKind> {
        node.children.iter().map(|c| c.kind).collect()
    }

    #[test]
    fn test_empty_document() {
        let root = build_source("");
        assert_eq!(root.kind, RuntimeKind::Root);
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_kinds() {
        let root = build_source(
            r#"text<p>x</p><if cond="1"></if><FOR var="i" from="0" to="1"></FOR>"#,
        );
        assert_eq!(
            kinds(&root),
            vec![
                RuntimeKind::Text,
                RuntimeKind::Element,
                RuntimeKind::If,
                RuntimeKind::For
            ]
        );
    }

    #[test]
    fn test_attributes_folded_and_sorted() {
        let root = build_source(r#"<div z="1" a="{{x}}" id="main">hi</div>"#);
        let div = &root.children[0];
        let names: Vec<_> = div.attrs.keys().copied().collect();
        assert_eq!(names, vec!["a", "z"]);
        assert_eq!(div.id.as_ref().map(|t| t.raw()), Some("main"));
        assert_eq!(kinds(div), vec![RuntimeKind::Text]);
        assert_eq!(div.children[0].text.raw(), "hi");
    }

    #[test]
    fn test_void_keeps_attributes() {
        let root = build_source(r#"<img src="a.png">"#);
        let img = &root.children[0];
        assert!(img.void);
        assert_eq!(img.attr("src").map(|t| t.raw()), Some("a.png"));
        assert!(img.children.is_empty());
    }

    #[test]
    fn test_attr_lookup_ignores_case() {
        let root = build_source(r#"<for VAR="i" from="0" to="2"></for>"#);
        assert_eq!(root.children[0].attr("var").map(|t| t.raw()), Some("i"));
    }

    #[test]
    fn test_source_order_preserved() {
        let root = build_source("<ul><li>a</li><li>b</li><li>c</li></ul>");
        let items: Vec<_> = root.children[0]
            .children
            .iter()
            .map(|li| li.children[0].text.raw())
            .collect();
        assert_eq!(items, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_placeholder_keys() {
        let root = build_source(
            r#"<a href="{{url}}" id="{{slug}}">{{title}} {{$upper@x}} {{title}}</a>"#,
        );
        let keys: Vec<_> = root.placeholder_keys().into_iter().collect();
        assert_eq!(keys, vec!["slug", "title", "url"]);
        let names: Vec<_> = root.function_names().into_iter().collect();
        assert_eq!(names, vec!["upper"]);
    }
}
