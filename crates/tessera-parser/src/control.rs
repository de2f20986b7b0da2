//! Static checks for the `for` and `if` control tags.
//!
//! The loop-bounds rule is also used by the renderer, which re-checks bounds
//! before iterating.

use crate::diagnostics::DiagnosticKind;
use crate::tree::Attr;

const FOR_ATTRS: [&str; 4] = ["var", "from", "to", "inc"];

/// Integer bounds of a `for` loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopBounds {
    pub from: i64,
    pub to: i64,
    pub inc: i64,
}

impl LoopBounds {
    pub fn new(from: i64, to: i64, inc: i64) -> Self {
        Self { from, to, inc }
    }

    /// Parse the literal `from`, `to` and optional `inc` values. `inc`
    /// defaults to 1. Returns `None` if any value is not an integer.
    pub fn from_values(from: &str, to: &str, inc: Option<&str>) -> Option<Self> {
        let from = parse_int(from)?;
        let to = parse_int(to)?;
        let inc = match inc {
            Some(inc) => parse_int(inc)?,
            None => 1,
        };
        Some(Self { from, to, inc })
    }

    /// False when the loop would never reach `to`.
    pub fn terminates(&self) -> bool {
        if self.from == self.to {
            return false;
        }
        if self.from > self.to {
            self.inc < 0
        } else {
            self.inc > 0
        }
    }

    /// The values the loop variable takes. Empty if the bounds do not
    /// terminate.
    pub fn iter(&self) -> impl Iterator<Item = i64> {
        let Self { from, to, inc } = *self;
        let start = self.terminates().then_some(from);
        std::iter::successors(start, move |&i| i.checked_add(inc))
            .take_while(move |&i| if inc > 0 { i < to } else { i > to })
    }
}

fn parse_int(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// Validate the attributes of a `for` tag: exactly `var`, `from`, `to` and an
/// optional `inc`, in that order. Returns the loop variable and bounds.
pub fn check_for<'src>(attrs: &[Attr<'src>]) -> Result<(&'src str, LoopBounds), DiagnosticKind> {
    if !(3..=4).contains(&attrs.len()) {
        return Err(DiagnosticKind::InvalidSyntaxInForTag);
    }
    let in_order = attrs
        .iter()
        .zip(FOR_ATTRS)
        .all(|(attr, name)| attr.name.eq_ignore_ascii_case(name));
    if !in_order {
        return Err(DiagnosticKind::InvalidSyntaxInForTag);
    }

    let var = attrs[0].value;
    let bounds = LoopBounds::from_values(
        attrs[1].value,
        attrs[2].value,
        attrs.get(3).map(|a| a.value),
    )
    .ok_or(DiagnosticKind::InvalidSyntaxInForTag)?;

    if !bounds.terminates() {
        return Err(DiagnosticKind::InfiniteLoopInForTag);
    }
    Ok((var, bounds))
}

/// Validate the attributes of an `if` tag: the first must be `cond`.
pub fn check_if(attrs: &[Attr<'_>]) -> Result<(), DiagnosticKind> {
    match attrs.first() {
        Some(attr) if attr.name.eq_ignore_ascii_case("cond") => Ok(()),
        _ => Err(DiagnosticKind::InvalidSyntaxInIfTag),
    }
}
