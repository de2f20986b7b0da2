//! Template-text scanner.
//!
//! Splits a run of text into literal segments and `{{key}}` placeholder
//! segments. Scanning never fails: brace balance is checked once at parse
//! time with [`unclosed_brace`], so by the time text is scanned an
//! unterminated `{{` can only come from input that skipped that check.

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// One piece of template text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'src> {
    /// Text written out as-is.
    Literal(&'src str),
    /// The trimmed key between `{{` and `}}`.
    Placeholder(&'src str),
}

/// Text pre-split into literal and placeholder segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateText<'src> {
    raw: &'src str,
    segments: Vec<Segment<'src>>,
}

impl<'src> TemplateText<'src> {
    /// Scan `text` into segments in a single left-to-right pass.
    ///
    /// Empty keys (`{{}}`, `{{ }}`) are logged and dropped. An unterminated
    /// `{{` makes the rest of the text a literal.
    pub fn scan(text: &'src str) -> Self {
        let mut segments = Vec::new();
        let mut rest = 0;

        while rest < text.len() {
            let Some(open) = text[rest..].find(OPEN).map(|i| rest + i) else {
                segments.push(Segment::Literal(&text[rest..]));
                break;
            };

            if open > rest {
                segments.push(Segment::Literal(&text[rest..open]));
            }

            let inner = open + OPEN.len();
            match text[inner..].find(CLOSE) {
                Some(len) => {
                    let key = text[inner..inner + len].trim();
                    if key.is_empty() {
                        tracing::warn!(offset = open, "dropping empty template tag {{{{}}}}");
                    } else {
                        segments.push(Segment::Placeholder(key));
                    }
                    rest = inner + len + CLOSE.len();
                }
                None => {
                    segments.push(Segment::Literal(&text[open..]));
                    break;
                }
            }
        }

        Self {
            raw: text,
            segments,
        }
    }

    /// The unscanned text.
    pub fn raw(&self) -> &'src str {
        self.raw
    }

    pub fn segments(&self) -> &[Segment<'src>] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when the text has no placeholders.
    pub fn is_literal(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }

    /// Placeholder keys in order of appearance (duplicates included).
    pub fn keys(&self) -> impl Iterator<Item = &'src str> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(key) => Some(*key),
            Segment::Literal(_) => None,
        })
    }
}

/// Offset of the first `{{` in `text` left without a matching `}}`.
///
/// Every `{{` counts as an open, overlapping ones included, so `{{{x}}` holds
/// two opens and one close. A `}}` closes the most recent open; one with no
/// open before it is plain text.
pub fn unclosed_brace(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut opens = Vec::new();
    for i in 0..bytes.len().saturating_sub(1) {
        match &bytes[i..i + 2] {
            b"{{" => opens.push(i),
            b"}}" => {
                opens.pop();
            }
            _ => {}
        }
    }
    opens.first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn segments(text: &str) -> Vec<Segment<'_>> {
        TemplateText::scan(text).segments().to_vec()
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    #[test]
    fn test_empty_text() {
        let text = TemplateText::scan("");
        assert!(text.is_empty());
        assert!(text.is_literal());
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(segments("just text"), vec![Segment::Literal("just text")]);
    }

    #[test]
    fn test_single_placeholder() {
        assert_eq!(segments("{{i}}"), vec![Segment::Placeholder("i")]);
    }

    #[test]
    fn test_mixed_segments() {
        assert_eq!(
            segments("a {{x}} b {{y}}"),
            vec![
                Segment::Literal("a "),
                Segment::Placeholder("x"),
                Segment::Literal(" b "),
                Segment::Placeholder("y"),
            ]
        );
    }

    #[test]
    fn test_adjacent_placeholders() {
        assert_eq!(
            segments("{{a}}{{b}}"),
            vec![Segment::Placeholder("a"), Segment::Placeholder("b")]
        );
    }

    #[test]
    fn test_key_is_trimmed() {
        assert_eq!(segments("{{ name }}"), vec![Segment::Placeholder("name")]);
    }

    #[test]
    fn test_function_key_kept_raw() {
        assert_eq!(
            segments("{{$upper@hello world}}"),
            vec![Segment::Placeholder("$upper@hello world")]
        );
    }

    #[test]
    fn test_empty_placeholder_dropped() {
        assert_eq!(
            segments("a{{}}b{{  }}c"),
            vec![
                Segment::Literal("a"),
                Segment::Literal("b"),
                Segment::Literal("c"),
            ]
        );
    }

    #[test]
    fn test_unterminated_placeholder_is_literal() {
        assert_eq!(
            segments("x {{oops"),
            vec![Segment::Literal("x "), Segment::Literal("{{oops")]
        );
    }

    #[test]
    fn test_lone_close_braces_are_literal() {
        assert_eq!(segments("a }} b"), vec![Segment::Literal("a }} b")]);
    }

    #[test]
    fn test_keys_and_raw() {
        let text = TemplateText::scan("{{a}} and {{b}} and {{a}}");
        assert_eq!(text.keys().collect::<Vec<_>>(), vec!["a", "b", "a"]);
        assert_eq!(text.raw(), "{{a}} and {{b}} and {{a}}");
        assert!(!text.is_literal());
    }

    // =========================================================================
    // Brace balance
    // =========================================================================

    #[test]
    fn test_balanced_braces() {
        assert_eq!(unclosed_brace(""), None);
        assert_eq!(unclosed_brace("{{a}} {{b}}"), None);
        assert_eq!(unclosed_brace("no braces } {"), None);
    }

    #[test]
    fn test_unclosed_brace_offset() {
        assert_eq!(unclosed_brace("ok {{a}} then {{b"), Some(14));
    }

    #[test]
    fn test_close_before_open_does_not_count() {
        assert_eq!(unclosed_brace("}} {{x"), Some(3));
    }

    #[test]
    fn test_nested_open_is_unbalanced() {
        assert_eq!(unclosed_brace("{{a {{b}}"), Some(0));
        assert_eq!(unclosed_brace("x {{a}} {{b {{c}}"), Some(8));
    }

    #[test]
    fn test_triple_open_brace_is_unbalanced() {
        assert_eq!(unclosed_brace("{{{x}}"), Some(0));
        assert_eq!(unclosed_brace("{{{x}}}}"), None);
    }

    #[test]
    fn test_extra_close_braces_are_text() {
        assert_eq!(unclosed_brace("{{x}}}"), None);
        assert_eq!(unclosed_brace("{{x}} }}"), None);
    }
}
