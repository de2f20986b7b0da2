//! Tessera Parser
//!
//! Parses HTML-like template markup into an arena-backed [`ParseTree`] and a
//! [`Report`] of diagnostics. Parsing never unwinds: the first fatal problem
//! is latched and the tree built up to that point is still returned.
//!
//! ```
//! use tessera_parser::Parser;
//!
//! let parsed = Parser::parse(r#"<ul id="list"><li>{{item}}</li></ul>"#);
//! assert!(parsed.report.is_clean());
//! assert_eq!(parsed.tree.roots().count(), 1);
//! ```

pub mod control;
pub mod diagnostics;
pub mod parser;
pub mod symbols;
pub mod tree;
pub mod vocab;

pub use control::LoopBounds;
pub use diagnostics::{Diagnostic, DiagnosticKind, Report, Severity};
pub use parser::{ParseOptions, Parsed, Parser};
pub use tree::{Child, NodeId, NodeKind, ParseNode, ParseTree};
pub use vocab::Vocabulary;

/// Parser error with position information.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Parse error at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub kind: DiagnosticKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            kind: diagnostic.kind,
            message: diagnostic.kind.message().to_string(),
            line: diagnostic.line,
            column: diagnostic.column,
        }
    }
}
