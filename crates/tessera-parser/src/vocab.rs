//! Tag vocabulary.
//!
//! Read-only, case-insensitive lookup sets consulted by the parser: known tag
//! names, void tags, boolean attributes and literal-content tags. The
//! vocabulary is passed into the parser rather than compiled in, so tests and
//! embedders can substitute their own.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Loop control tag: `<for var="i" from="0" to="3">`.
pub const FOR_TAG: &str = "for";
/// Conditional control tag: `<if cond="1">`.
pub const IF_TAG: &str = "if";
/// Synthetic node holding an element's attribute chain.
pub const ATTR_TAG: &str = "@attr";
/// Synthetic node holding bare text content.
pub const TEXT_TAG: &str = "@text";
/// The attribute recorded as the element id instead of in its attribute list.
pub const ID_ATTR: &str = "id";

/// HTML5 element names (plus a few legacy ones still seen in templates).
pub const HTML_TAGS: &[&str] = &[
    "a", "abbr", "address", "area", "article", "aside", "audio", "b", "base", "bdi", "bdo",
    "blockquote", "body", "br", "button", "canvas", "caption", "center", "cite", "code", "col",
    "colgroup", "data", "datalist", "dd", "del", "details", "dfn", "dialog", "div", "dl", "dt",
    "em", "embed", "fieldset", "figcaption", "figure", "font", "footer", "form", "h1", "h2", "h3",
    "h4", "h5", "h6", "head", "header", "hgroup", "hr", "html", "i", "iframe", "img", "input",
    "ins", "kbd", "label", "legend", "li", "link", "main", "map", "mark", "menu", "meta", "meter",
    "nav", "noscript", "object", "ol", "optgroup", "option", "output", "p", "param", "picture",
    "pre", "progress", "q", "rp", "rt", "ruby", "s", "samp", "script", "search", "section",
    "select", "slot", "small", "source", "span", "strong", "style", "sub", "summary", "sup",
    "table", "tbody", "td", "template", "textarea", "tfoot", "th", "thead", "time", "title", "tr",
    "track", "tt", "u", "ul", "var", "video", "wbr", "xmp",
];

/// HTML5 void elements (no children, no close tag).
pub const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Attributes that may appear without a value.
pub const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "allowfullscreen", "async", "autofocus", "autoplay", "checked", "controls", "default",
    "defer", "disabled", "formnovalidate", "hidden", "inert", "ismap", "itemscope", "loop",
    "multiple", "muted", "nomodule", "novalidate", "open", "playsinline", "readonly", "required",
    "reversed", "selected",
];

/// Tags whose text content keeps its surrounding whitespace.
pub const LITERAL_TAGS: &[&str] = &["pre"];

static HTML: LazyLock<Vocabulary> =
    LazyLock::new(|| Vocabulary::new(HTML_TAGS, VOID_TAGS, BOOLEAN_ATTRIBUTES));

/// Case-insensitive tag and attribute lookup sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    tags: HashSet<String>,
    void_tags: HashSet<String>,
    boolean_attrs: HashSet<String>,
    literal_tags: HashSet<String>,
}

impl Vocabulary {
    /// Build a vocabulary. Void tags count as known tags. Literal-content tags
    /// default to [`LITERAL_TAGS`].
    pub fn new<T, V, B>(tags: T, void_tags: V, boolean_attrs: B) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        V: IntoIterator,
        V::Item: AsRef<str>,
        B: IntoIterator,
        B::Item: AsRef<str>,
    {
        let void_tags = lowercase_set(void_tags);
        let mut tags = lowercase_set(tags);
        tags.extend(void_tags.iter().cloned());

        Self {
            tags,
            void_tags,
            boolean_attrs: lowercase_set(boolean_attrs),
            literal_tags: lowercase_set(LITERAL_TAGS),
        }
    }

    /// Replace the literal-content tag set.
    pub fn with_literal_tags<L>(mut self, literal_tags: L) -> Self
    where
        L: IntoIterator,
        L::Item: AsRef<str>,
    {
        self.literal_tags = lowercase_set(literal_tags);
        self
    }

    /// The shared standard HTML5 vocabulary.
    pub fn html() -> &'static Vocabulary {
        &HTML
    }

    pub fn is_known(&self, tag: &str) -> bool {
        contains(&self.tags, tag)
    }

    pub fn is_void(&self, tag: &str) -> bool {
        contains(&self.void_tags, tag)
    }

    pub fn is_boolean_attr(&self, name: &str) -> bool {
        contains(&self.boolean_attrs, name)
    }

    pub fn is_literal(&self, tag: &str) -> bool {
        contains(&self.literal_tags, tag)
    }

    /// `for` and `if` are control tags in every vocabulary.
    pub fn is_control(tag: &str) -> bool {
        tag.eq_ignore_ascii_case(FOR_TAG) || tag.eq_ignore_ascii_case(IF_TAG)
    }
}

fn lowercase_set<I>(items: I) -> HashSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().to_ascii_lowercase())
        .collect()
}

fn contains(set: &HashSet<String>, name: &str) -> bool {
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        set.contains(&name.to_ascii_lowercase())
    } else {
        set.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_known_tags() {
        let vocab = Vocabulary::html();
        assert!(vocab.is_known("div"));
        assert!(vocab.is_known("DIV"));
        assert!(vocab.is_known("h1"));
        assert!(!vocab.is_known("blink"));
    }

    #[test]
    fn test_html_void_tags() {
        let vocab = Vocabulary::html();
        assert!(vocab.is_void("br"));
        assert!(vocab.is_void("Img"));
        assert!(!vocab.is_void("div"));
    }

    #[test]
    fn test_boolean_attributes() {
        let vocab = Vocabulary::html();
        assert!(vocab.is_boolean_attr("disabled"));
        assert!(vocab.is_boolean_attr("CHECKED"));
        assert!(!vocab.is_boolean_attr("class"));
    }

    #[test]
    fn test_literal_tags() {
        assert!(Vocabulary::html().is_literal("pre"));
        assert!(!Vocabulary::html().is_literal("p"));
    }

    #[test]
    fn test_control_tags() {
        assert!(Vocabulary::is_control("for"));
        assert!(Vocabulary::is_control("IF"));
        assert!(!Vocabulary::is_control("form"));
    }

    #[test]
    fn test_custom_vocabulary() {
        let vocab = Vocabulary::new(["card"], ["spacer"], ["compact"]);
        assert!(vocab.is_known("card"));
        assert!(vocab.is_known("spacer"));
        assert!(vocab.is_void("spacer"));
        assert!(vocab.is_boolean_attr("compact"));
        assert!(!vocab.is_known("div"));
    }

    #[test]
    fn test_custom_literal_tags() {
        let vocab = Vocabulary::new(["code"], Vec::<&str>::new(), Vec::<&str>::new())
            .with_literal_tags(["code"]);
        assert!(vocab.is_literal("code"));
        assert!(!vocab.is_literal("pre"));
    }
}
