//! Tessera Renderer
//!
//! Turns a parsed template into text. The parse arena is first built into a
//! [`RuntimeNode`] tree, then rendered against a [`Context`] of values and a
//! registry of extension [`Functions`].
//!
//! ```text
//! source → Parser → ParseTree → build() → RuntimeNode → render() → String
//! ```
//!
//! ```
//! use tessera_render::{Context, Functions, Template};
//!
//! let template = Template::parse(r#"<ul><for var="i" from="1" to="3"><li>{{i}}</li></for></ul>"#).unwrap();
//! let html = template.render(&mut Context::new(), &Functions::new()).unwrap();
//! assert_eq!(html, "<ul>\n  <li>1</li>\n  <li>2</li>\n</ul>\n");
//! ```

pub mod function;
pub mod render;
pub mod runtime;
pub mod value;

pub use function::{Function, Functions};
pub use render::render;
pub use runtime::{build, RuntimeKind, RuntimeNode};
pub use value::{Context, Value};

use std::collections::BTreeSet;
use std::fmt;
use tessera_parser::{Diagnostic, ParseError, ParseOptions, Parser, Vocabulary};

/// Render error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("Render error: undefined key '{0}'")]
    UndefinedKey(String),
    #[error("Render error: undefined function '{0}'")]
    UndefinedFunction(String),
    #[error("Render error: attribute '{attribute}' of <{tag}> is not a number: '{value}'")]
    InvalidInteger {
        tag: String,
        attribute: String,
        value: String,
    },
    #[error("Render error: <{tag}> is missing attribute '{attribute}'")]
    MissingAttribute { tag: String, attribute: String },
    #[error("Render error: loop from {from} to {to} by {inc} never terminates")]
    InfiniteLoop { from: i64, to: i64, inc: i64 },
    #[error("Render error: {0}")]
    Write(#[from] fmt::Error),
}

/// A parsed template, ready to render any number of times.
#[derive(Debug, Clone)]
pub struct Template<'src> {
    root: RuntimeNode<'src>,
    warnings: Vec<Diagnostic>,
}

impl<'src> Template<'src> {
    /// Parse `source` against the standard HTML vocabulary.
    pub fn parse(source: &'src str) -> Result<Self, ParseError> {
        Self::parse_with(source, Vocabulary::html(), ParseOptions::default())
    }

    /// Parse `source` against a custom vocabulary.
    pub fn parse_with(
        source: &'src str,
        vocab: &Vocabulary,
        options: ParseOptions,
    ) -> Result<Self, ParseError> {
        let parsed = Parser::parse_with(source, vocab, options);
        let warnings = parsed.report.warnings().to_vec();
        let tree = parsed.into_result()?;
        Ok(Self {
            root: build(&tree),
            warnings,
        })
    }

    pub fn root(&self) -> &RuntimeNode<'src> {
        &self.root
    }

    /// Non-fatal diagnostics from parsing.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Context keys the template references.
    pub fn keys(&self) -> BTreeSet<&'src str> {
        self.root.placeholder_keys()
    }

    /// Extension functions the template calls.
    pub fn function_names(&self) -> BTreeSet<&'src str> {
        self.root.function_names()
    }

    /// Render to a new string.
    pub fn render(&self, ctx: &mut Context, functions: &Functions) -> Result<String, RenderError> {
        let mut out = String::new();
        self.render_to(&mut out, ctx, functions)?;
        Ok(out)
    }

    /// Render into `out`.
    pub fn render_to(
        &self,
        out: &mut dyn fmt::Write,
        ctx: &mut Context,
        functions: &Functions,
    ) -> Result<(), RenderError> {
        render(&self.root, out, ctx, functions)
    }
}
