//! Parse diagnostics.
//!
//! The parser never unwinds. Problems are recorded in a [`Report`]: the first
//! fatal diagnostic is latched and later ones are ignored, while warnings
//! accumulate up to a fixed cap.

use serde::Serialize;
use std::fmt;
use tessera_lexer::Position;

/// Default cap on the number of warnings kept in a report.
pub const DEFAULT_MAX_WARNINGS: usize = 20;

/// Whether a diagnostic stops the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Fatal,
}

/// Every problem the parser can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    ExpectingAnIdentifier,
    UnexpectedCharacter,
    ExpectingTagNameAfterOpenBracket,
    EmptyValueForNonBooleanAttribute,
    DuplicateId,
    ExpectingValueForAttribute,
    MissingOpenBracket,
    UnknownTagName,
    MissingCloseBracketOnVoidTag,
    MissingCloseBracketOnOpenTag,
    ExpectingCloseTag,
    MismatchedCloseTag,
    MissingCloseBracketInCloseTag,
    MissingCloseBraceInTemplate,
    UnexpectedEndOfStream,
    InvalidSyntaxInForTag,
    InvalidSyntaxInIfTag,
    InfiniteLoopInForTag,
}

impl DiagnosticKind {
    pub fn severity(self) -> Severity {
        match self {
            Self::DuplicateId | Self::UnknownTagName => Severity::Warning,
            _ => Severity::Fatal,
        }
    }

    pub fn is_fatal(self) -> bool {
        self.severity() == Severity::Fatal
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::ExpectingAnIdentifier => "expecting an identifier",
            Self::UnexpectedCharacter => "unexpected character inside tag content",
            Self::ExpectingTagNameAfterOpenBracket => "expecting a tag name after '<'",
            Self::EmptyValueForNonBooleanAttribute => "empty value for non-boolean attribute",
            Self::DuplicateId => "duplicate id on tag",
            Self::ExpectingValueForAttribute => "expecting a value for attribute",
            Self::MissingOpenBracket => "missing '<'",
            Self::UnknownTagName => "unknown tag name",
            Self::MissingCloseBracketOnVoidTag => "missing '>' on void tag",
            Self::MissingCloseBracketOnOpenTag => "missing '>' on open tag",
            Self::ExpectingCloseTag => "expecting a close tag",
            Self::MismatchedCloseTag => "mismatched close tag",
            Self::MissingCloseBracketInCloseTag => "missing '>' in close tag",
            Self::MissingCloseBraceInTemplate => "missing '}}' in template",
            Self::UnexpectedEndOfStream => "unexpected end of input",
            Self::InvalidSyntaxInForTag => {
                "invalid syntax in for tag, expected var, from, to and optional inc"
            }
            Self::InvalidSyntaxInIfTag => "invalid syntax in if tag, expected cond",
            Self::InfiniteLoopInForTag => "for tag never terminates",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A located diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Diagnostic {
    /// Resolve `offset` in `source` to a line and column.
    pub fn new(kind: DiagnosticKind, source: &str, offset: usize) -> Self {
        let Position { line, column } = Position::locate(source, offset);
        Self {
            kind,
            offset,
            line,
            column,
        }
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

/// The outcome of a parse: at most one fatal diagnostic and a capped,
/// ordered list of warnings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    fatal: Option<Diagnostic>,
    warnings: Vec<Diagnostic>,
    #[serde(skip)]
    max_warnings: usize,
}

impl Default for Report {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WARNINGS)
    }
}

impl Report {
    pub fn new(max_warnings: usize) -> Self {
        Self {
            fatal: None,
            warnings: Vec::new(),
            max_warnings,
        }
    }

    /// Latch a fatal diagnostic. Returns `false` if one was already latched,
    /// in which case `diagnostic` is discarded.
    pub fn latch(&mut self, diagnostic: Diagnostic) -> bool {
        if self.fatal.is_some() {
            return false;
        }
        self.fatal = Some(diagnostic);
        true
    }

    /// Record a warning. Returns `false` once the cap is reached.
    pub fn warn(&mut self, diagnostic: Diagnostic) -> bool {
        if self.is_full() {
            return false;
        }
        self.warnings.push(diagnostic);
        true
    }

    /// True when no more warnings will be kept.
    pub fn is_full(&self) -> bool {
        self.warnings.len() >= self.max_warnings
    }

    pub fn fatal(&self) -> Option<&Diagnostic> {
        self.fatal.as_ref()
    }

    pub fn has_fatal(&self) -> bool {
        self.fatal.is_some()
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// No fatal diagnostic and no warnings.
    pub fn is_clean(&self) -> bool {
        self.fatal.is_none() && self.warnings.is_empty()
    }

    /// Every diagnostic, warnings first in source order, then the fatal one.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.warnings.iter().chain(self.fatal.iter())
    }
}
