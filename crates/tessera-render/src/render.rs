//! Renderer.
//!
//! Walks a [`RuntimeNode`] tree and writes markup, resolving placeholders
//! against a [`Context`] and evaluating `if` and `for`. Elements are written
//! one per line, indented two spaces per level; an element whose children are
//! all text is written on a single line. Control tags produce no markup of
//! their own: their children render at the control tag's depth.

use crate::function::{parse_call, Functions};
use crate::runtime::{RuntimeKind, RuntimeNode};
use crate::value::Context;
use crate::RenderError;
use std::fmt::{self, Write};
use tessera_lexer::{Segment, TemplateText};
use tessera_parser::LoopBounds;

/// Render `node` into `out`.
///
/// The context is left as it was found except for changes made by extension
/// functions: loop variables are unbound or restored after each loop, even
/// when rendering fails partway.
pub fn render(
    node: &RuntimeNode<'_>,
    out: &mut dyn fmt::Write,
    ctx: &mut Context,
    functions: &Functions,
) -> Result<(), RenderError> {
    let mut renderer = Renderer {
        out,
        ctx,
        functions,
    };
    renderer.render_node(node, 0)
}

/// Write `text` with every placeholder resolved.
pub fn write_template(
    out: &mut dyn fmt::Write,
    text: &TemplateText<'_>,
    ctx: &mut Context,
    functions: &Functions,
) -> Result<(), RenderError> {
    for segment in text.segments() {
        match *segment {
            Segment::Literal(literal) => out.write_str(literal)?,
            Segment::Placeholder(key) => write_placeholder(out, key, ctx, functions)?,
        }
    }
    Ok(())
}

fn write_placeholder(
    out: &mut dyn fmt::Write,
    key: &str,
    ctx: &mut Context,
    functions: &Functions,
) -> Result<(), RenderError> {
    if let Some((name, param)) = parse_call(key) {
        let function = functions
            .get(name)
            .ok_or_else(|| RenderError::UndefinedFunction(name.to_string()))?;
        function(out, param, ctx)?;
        return Ok(());
    }
    let value = ctx
        .get(key)
        .ok_or_else(|| RenderError::UndefinedKey(key.to_string()))?;
    write!(out, "{value}")?;
    Ok(())
}

struct Renderer<'r> {
    out: &'r mut dyn fmt::Write,
    ctx: &'r mut Context,
    functions: &'r Functions,
}

impl Renderer<'_> {
    fn render_node(&mut self, node: &RuntimeNode<'_>, depth: usize) -> Result<(), RenderError> {
        match node.kind {
            RuntimeKind::Root => self.render_children(node, depth),
            RuntimeKind::Text => {
                self.indent(depth)?;
                self.template(&node.text)?;
                self.out.write_char('\n')?;
                Ok(())
            }
            RuntimeKind::If => self.render_if(node, depth),
            RuntimeKind::For => self.render_for(node, depth),
            RuntimeKind::Element => self.render_element(node, depth),
        }
    }

    fn render_children(&mut self, node: &RuntimeNode<'_>, depth: usize) -> Result<(), RenderError> {
        for child in &node.children {
            self.render_node(child, depth)?;
        }
        Ok(())
    }

    // =========================================================================
    // Elements
    // =========================================================================

    fn render_element(&mut self, node: &RuntimeNode<'_>, depth: usize) -> Result<(), RenderError> {
        self.indent(depth)?;
        write!(self.out, "<{}", node.tag)?;
        if let Some(id) = &node.id {
            self.out.write_str(" id=\"")?;
            self.template(id)?;
            self.out.write_char('"')?;
        }
        for (name, value) in &node.attrs {
            write!(self.out, " {name}=\"")?;
            self.template(value)?;
            self.out.write_char('"')?;
        }
        self.out.write_char('>')?;

        if node.void {
            self.out.write_char('\n')?;
            return Ok(());
        }

        let inline = node.children.iter().all(|c| c.kind == RuntimeKind::Text);
        if inline {
            for child in &node.children {
                self.template(&child.text)?;
            }
        } else {
            self.out.write_char('\n')?;
            for child in &node.children {
                self.render_node(child, depth + 1)?;
            }
            self.indent(depth)?;
        }

        writeln!(self.out, "</{}>", node.tag)?;
        Ok(())
    }

    // =========================================================================
    // Control tags
    // =========================================================================

    fn render_if(&mut self, node: &RuntimeNode<'_>, depth: usize) -> Result<(), RenderError> {
        let cond = required(node, "cond")?;
        let mut rendered = String::new();
        write_template(&mut rendered, cond, self.ctx, self.functions)?;

        let truth = parse_condition(&rendered).ok_or_else(|| RenderError::InvalidInteger {
            tag: node.tag.to_string(),
            attribute: "cond".to_string(),
            value: rendered.clone(),
        })?;
        if truth {
            self.render_children(node, depth)?;
        }
        Ok(())
    }

    fn render_for(&mut self, node: &RuntimeNode<'_>, depth: usize) -> Result<(), RenderError> {
        let var = required(node, "var")?.raw();
        let from = integer(node, "from")?;
        let to = integer(node, "to")?;
        let inc = match node.attr("inc") {
            Some(_) => integer(node, "inc")?,
            None => 1,
        };

        let bounds = LoopBounds::new(from, to, inc);
        if !bounds.terminates() {
            return Err(RenderError::InfiniteLoop { from, to, inc });
        }

        tracing::trace!(var, from, to, inc, "entering loop");
        let saved = self.ctx.remove(var);
        let result = bounds.iter().try_for_each(|i| {
            self.ctx.set(var, i);
            self.render_children(node, depth)
        });
        match saved {
            Some(value) => {
                self.ctx.set(var, value);
            }
            None => {
                self.ctx.remove(var);
            }
        }
        result
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn template(&mut self, text: &TemplateText<'_>) -> Result<(), RenderError> {
        write_template(self.out, text, self.ctx, self.functions)
    }

    fn indent(&mut self, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            self.out.write_str("  ")?;
        }
        Ok(())
    }
}

fn required<'n, 'src>(
    node: &'n RuntimeNode<'src>,
    attribute: &str,
) -> Result<&'n TemplateText<'src>, RenderError> {
    node.attr(attribute)
        .ok_or_else(|| RenderError::MissingAttribute {
            tag: node.tag.to_string(),
            attribute: attribute.to_string(),
        })
}

/// A loop bound: an integer literal.
fn integer(node: &RuntimeNode<'_>, attribute: &str) -> Result<i64, RenderError> {
    let raw = required(node, attribute)?.raw();
    raw.trim()
        .parse()
        .map_err(|_| RenderError::InvalidInteger {
            tag: node.tag.to_string(),
            attribute: attribute.to_string(),
            value: raw.to_string(),
        })
}

/// Nonzero is true. Integers and floats are both accepted.
fn parse_condition(rendered: &str) -> Option<bool> {
    let rendered = rendered.trim();
    if let Ok(n) = rendered.parse::<i64>() {
        return Some(n != 0);
    }
    rendered.parse::<f64>().ok().map(|n| n != 0.0)
}
