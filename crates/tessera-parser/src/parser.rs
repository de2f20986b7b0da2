//! Markup parser for Tessera templates.
//!
//! Recursive descent straight over the source bytes (no token stream):
//!
//! ```text
//! HTML      := CONTENT*
//! CONTENT   := TEXT | ELEMENT
//! ELEMENT   := OPEN_TAG HTML CLOSE_TAG | OPEN_TAG      (void)
//! OPEN_TAG  := '<' NAME ATTRIBUTE* ['/'] '>'
//! ATTRIBUTE := NAME [ '=' ( '"' .. '"' | '\'' .. '\'' | VALUE ) ]
//! CLOSE_TAG := '</' NAME '>'
//! ```
//!
//! The parser does not stop at the first problem by unwinding. Each
//! diagnostic goes into a [`Report`]; once a fatal one is latched every parse
//! step returns without consuming input, so the caller always gets back the
//! tree built so far.

use crate::control::{check_for, check_if};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Report, DEFAULT_MAX_WARNINGS};
use crate::symbols::SymbolTable;
use crate::tree::{Attr, Child, NodeId, ParseNode, ParseTree};
use crate::vocab::{Vocabulary, FOR_TAG, ID_ATTR, IF_TAG};
use crate::ParseError;
use tessera_lexer::cursor::{is_alnum, is_alpha, is_attr_name, is_attr_value};
use tessera_lexer::{unclosed_brace, Cursor};

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Warnings past this count are dropped.
    pub max_warnings: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_warnings: DEFAULT_MAX_WARNINGS,
        }
    }
}

/// Result of a parse: the tree (complete, or as far as parsing got) and the
/// diagnostics collected on the way.
#[derive(Debug, Clone)]
pub struct Parsed<'src> {
    pub tree: ParseTree<'src>,
    pub report: Report,
}

impl<'src> Parsed<'src> {
    /// True when no fatal diagnostic was latched.
    pub fn is_ok(&self) -> bool {
        !self.report.has_fatal()
    }

    /// The tree, or the fatal diagnostic as an error. Warnings are discarded.
    pub fn into_result(self) -> Result<ParseTree<'src>, ParseError> {
        match self.report.fatal() {
            Some(fatal) => Err(ParseError::from(*fatal)),
            None => Ok(self.tree),
        }
    }
}

/// An open tag with its attributes split from its id.
struct OpenTag<'src> {
    tag: &'src str,
    id: Option<&'src str>,
    attrs: Vec<Attr<'src>>,
}

/// Tessera markup parser.
pub struct Parser<'src, 'v> {
    cursor: Cursor<'src>,
    vocab: &'v Vocabulary,
    tree: ParseTree<'src>,
    ids: SymbolTable,
    report: Report,
}

impl<'src, 'v> Parser<'src, 'v> {
    /// Create a parser over `source`.
    pub fn new(source: &'src str, vocab: &'v Vocabulary, options: ParseOptions) -> Self {
        Self {
            cursor: Cursor::new(source),
            vocab,
            tree: ParseTree::new(source),
            ids: SymbolTable::new(),
            report: Report::new(options.max_warnings),
        }
    }

    /// Parse `source` against the standard HTML vocabulary.
    pub fn parse(source: &'src str) -> Parsed<'src> {
        Parser::parse_with(source, Vocabulary::html(), ParseOptions::default())
    }

    /// Parse `source` against a custom vocabulary.
    pub fn parse_with(source: &'src str, vocab: &'v Vocabulary, options: ParseOptions) -> Parsed<'src> {
        let mut parser = Parser::new(source, vocab, options);
        parser.parse_document();
        Parsed {
            tree: parser.tree,
            report: parser.report,
        }
    }

    fn parse_document(&mut self) {
        self.parse_html(None, None);
        if self.failed() || self.cursor.rest_is_whitespace() {
            return;
        }
        // parse_html only stops early on a close tag nobody opened.
        self.parse_stray_close_tag();
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Parse content until end of input, a close tag, or a fatal error.
    /// New nodes are linked under `parent` after `last`.
    fn parse_html(&mut self, parent: Option<NodeId>, mut last: Option<NodeId>) {
        while !self.failed() && !self.cursor.rest_is_whitespace() {
            if self.at_close_tag() {
                break;
            }
            if let Some(node) = self.parse_content(parent) {
                self.tree.link(parent, last, node);
                last = Some(node);
            }
        }
    }

    fn parse_content(&mut self, parent: Option<NodeId>) -> Option<NodeId> {
        if self.at_open_tag() {
            return self.parse_element();
        }
        if self.failed() {
            return None;
        }
        let literal = parent.is_some_and(|p| self.vocab.is_literal(self.tree.node(p).tag));
        self.parse_text(!literal)
    }

    /// `<` followed by a letter. Latches an error for `<` followed by anything
    /// other than a letter or `/`.
    fn at_open_tag(&mut self) -> bool {
        if self.cursor.peek() != Some(b'<') {
            return false;
        }
        match self.cursor.peek_at(1) {
            Some(b) if is_alpha(b) => true,
            Some(b'/') => false,
            _ => {
                self.error_at(
                    DiagnosticKind::ExpectingTagNameAfterOpenBracket,
                    self.cursor.offset() + 1,
                );
                false
            }
        }
    }

    /// `</` followed by a letter. Latches an error for `</` followed by
    /// anything else.
    fn at_close_tag(&mut self) -> bool {
        if self.cursor.peek() != Some(b'<') || self.cursor.peek_at(1) != Some(b'/') {
            return false;
        }
        if self.cursor.peek_at(2).is_some_and(is_alpha) {
            return true;
        }
        self.error_at(
            DiagnosticKind::ExpectingAnIdentifier,
            self.cursor.offset() + 2,
        );
        false
    }

    /// Text up to the next `<` or end of input. Whitespace-only text is
    /// dropped when `trim` is set.
    fn parse_text(&mut self, trim: bool) -> Option<NodeId> {
        let start = self.cursor.offset();
        let raw = match self.cursor.eat_until(b'<', |b| b == b'>') {
            Ok(raw) => raw,
            Err(at) => {
                self.error_at(DiagnosticKind::UnexpectedCharacter, at);
                return None;
            }
        };
        if let Some(at) = unclosed_brace(raw) {
            self.error_at(DiagnosticKind::MissingCloseBraceInTemplate, start + at);
            return None;
        }

        let text = if trim {
            raw.trim_matches(|c: char| c <= ' ')
        } else {
            raw
        };
        if text.is_empty() {
            return None;
        }
        tracing::trace!(text, "text");
        Some(self.tree.push(ParseNode::text(text)))
    }

    // =========================================================================
    // Elements
    // =========================================================================

    fn parse_element(&mut self) -> Option<NodeId> {
        let OpenTag { tag, id, attrs } = self.parse_open_tag()?;

        let node = self.tree.push(ParseNode::element(tag));
        self.tree.node_mut(node).id = id;
        let attr_list = self.append_attributes(node, &attrs);

        if self.vocab.is_void(tag) {
            self.tree.node_mut(node).child = Child::Void(attr_list);
            return Some(node);
        }

        self.parse_html(Some(node), attr_list);
        self.parse_close_tag(tag);
        Some(node)
    }

    fn parse_open_tag(&mut self) -> Option<OpenTag<'src>> {
        self.cursor.advance(); // consume <
        let tag_start = self.cursor.offset();
        let tag = self.cursor.eat_while(is_alnum);

        let control = Vocabulary::is_control(tag);
        if !control && !self.vocab.is_known(tag) {
            self.warn_at(DiagnosticKind::UnknownTagName, tag_start);
        }

        let mut id = None;
        let mut attrs = Vec::new();
        loop {
            self.cursor.skip_whitespace();
            if !self.cursor.peek().is_some_and(is_alpha) {
                break;
            }
            let attr = self.parse_attribute()?;
            if attr.name.eq_ignore_ascii_case(ID_ATTR) {
                id = Some(attr.value);
            } else {
                attrs.push(attr);
            }
        }

        let void = self.vocab.is_void(tag);
        if void && self.cursor.eat("/") {
            self.cursor.skip_whitespace();
        }
        if !self.cursor.eat(">") {
            let kind = if void {
                DiagnosticKind::MissingCloseBracketOnVoidTag
            } else {
                DiagnosticKind::MissingCloseBracketOnOpenTag
            };
            self.error(kind);
            return None;
        }

        if control {
            let checked = if tag.eq_ignore_ascii_case(FOR_TAG) {
                check_for(&attrs).map(|_| ())
            } else {
                debug_assert!(tag.eq_ignore_ascii_case(IF_TAG));
                check_if(&attrs)
            };
            if let Err(kind) = checked {
                self.error_at(kind, tag_start);
                return None;
            }
        }

        tracing::trace!(tag, attributes = attrs.len(), "open tag");
        Some(OpenTag { tag, id, attrs })
    }

    /// `name`, `name=value`, `name="value"` or `name='value'`.
    fn parse_attribute(&mut self) -> Option<Attr<'src>> {
        let name = self.cursor.eat_while(is_attr_name);
        let boolean = self.vocab.is_boolean_attr(name);

        self.cursor.skip_whitespace();
        if !self.cursor.eat("=") {
            if boolean {
                return Some(Attr { name, value: name });
            }
            self.error(DiagnosticKind::ExpectingValueForAttribute);
            return None;
        }
        self.cursor.skip_whitespace();

        let mut value_start = self.cursor.offset();
        let mut value = match self.cursor.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                self.cursor.advance();
                value_start += 1;
                let value = self.cursor.eat_to(quote);
                if self.cursor.is_at_end() {
                    self.error(DiagnosticKind::UnexpectedEndOfStream);
                    return None;
                }
                self.cursor.advance(); // consume closing quote
                value
            }
            Some(b) if is_attr_value(b) => self.cursor.eat_while(is_attr_value),
            _ => {
                self.error(DiagnosticKind::ExpectingValueForAttribute);
                return None;
            }
        };

        if value.is_empty() {
            if !boolean {
                self.error_at(DiagnosticKind::EmptyValueForNonBooleanAttribute, value_start);
                return None;
            }
            value = name;
        }
        if let Some(at) = unclosed_brace(value) {
            self.error_at(DiagnosticKind::MissingCloseBraceInTemplate, value_start + at);
            return None;
        }
        if name.eq_ignore_ascii_case(ID_ATTR) && !self.ids.insert(value) {
            self.warn_at(DiagnosticKind::DuplicateId, value_start);
        }

        tracing::trace!(name, value, "attribute");
        Some(Attr { name, value })
    }

    /// Chain `attrs` under a new `@attr` node as the first child of `node`.
    fn append_attributes(&mut self, node: NodeId, attrs: &[Attr<'src>]) -> Option<NodeId> {
        if attrs.is_empty() {
            return None;
        }
        let list = self.tree.push(ParseNode::attr_list());
        self.tree.link(Some(node), None, list);

        let mut prev = None;
        for attr in attrs {
            let id = self.tree.push(ParseNode::attribute(attr.name, attr.value));
            self.tree.link(Some(list), prev, id);
            prev = Some(id);
        }
        Some(list)
    }

    fn parse_close_tag(&mut self, expected: &str) {
        if self.failed() {
            return;
        }
        self.cursor.skip_whitespace();
        if self.cursor.is_at_end() {
            self.error(DiagnosticKind::UnexpectedEndOfStream);
            return;
        }
        if !self.cursor.eat("</") {
            self.error(DiagnosticKind::ExpectingCloseTag);
            return;
        }

        let name_start = self.cursor.offset();
        let name = self.cursor.eat_while(is_alnum);
        if !name.eq_ignore_ascii_case(expected) {
            self.error_at(self.mismatch_kind(name), name_start);
            return;
        }

        self.cursor.skip_whitespace();
        if !self.cursor.eat(">") {
            self.error(DiagnosticKind::MissingCloseBracketInCloseTag);
        }
    }

    fn parse_stray_close_tag(&mut self) {
        self.cursor.eat("</");
        let name_start = self.cursor.offset();
        let name = self.cursor.eat_while(is_alnum);
        self.error_at(self.mismatch_kind(name), name_start);
    }

    /// A close tag naming a void element means its open tag was treated as
    /// complete on its own.
    fn mismatch_kind(&self, name: &str) -> DiagnosticKind {
        if self.vocab.is_void(name) {
            DiagnosticKind::MissingCloseBracketOnVoidTag
        } else {
            DiagnosticKind::MismatchedCloseTag
        }
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    fn failed(&self) -> bool {
        self.report.has_fatal()
    }

    fn error(&mut self, kind: DiagnosticKind) {
        self.error_at(kind, self.cursor.offset());
    }

    fn error_at(&mut self, kind: DiagnosticKind, offset: usize) {
        let diagnostic = Diagnostic::new(kind, self.cursor.source(), offset);
        if self.report.latch(diagnostic) {
            tracing::debug!(%diagnostic, "parse failed");
        }
    }

    fn warn_at(&mut self, kind: DiagnosticKind, offset: usize) {
        if self.report.is_full() {
            return;
        }
        let diagnostic = Diagnostic::new(kind, self.cursor.source(), offset);
        tracing::debug!(%diagnostic, "parse warning");
        self.report.warn(diagnostic);
    }
}
