/// Byte cursor over markup source.
///
/// The parser drives this directly (there is no separate token stream).
/// It looks ahead with `peek_at` and never rewinds.
///
/// Every delimiter the grammar cares about is ASCII, and the classifiers
/// below reject non-ASCII bytes, so every slice handed out by the cursor
/// starts and ends on a `char` boundary.
#[derive(Debug, Clone)]
pub struct Cursor<'src> {
    source: &'src str,
    pos: usize,
}

impl<'src> Cursor<'src> {
    /// Create a cursor at the start of `source`.
    pub fn new(source: &'src str) -> Self {
        Self { source, pos: 0 }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Current byte offset.
    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    /// Peek `n` bytes past the current position.
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + n).copied()
    }

    pub fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_space) {
            self.pos += 1;
        }
    }

    /// True when nothing but whitespace remains.
    pub fn rest_is_whitespace(&self) -> bool {
        self.source.as_bytes()[self.pos..].iter().all(|&b| is_space(b))
    }

    /// Consume `expected` if the input continues with it.
    /// On a mismatch the cursor does not move.
    pub fn eat(&mut self, expected: &str) -> bool {
        if self.source[self.pos..].starts_with(expected) {
            self.pos += expected.len();
            true
        } else {
            false
        }
    }

    /// Consume the longest run of bytes matching `pred`. May be empty.
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) -> &'src str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        &self.source[start..self.pos]
    }

    /// Consume everything up to (not including) `delim` or the end of input.
    ///
    /// If a byte matching `reject` shows up first, the cursor stops on it and
    /// its offset is returned as the error.
    pub fn eat_until(
        &mut self,
        delim: u8,
        reject: impl Fn(u8) -> bool,
    ) -> Result<&'src str, usize> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == delim {
                break;
            }
            if reject(b) {
                return Err(self.pos);
            }
            self.pos += 1;
        }
        Ok(&self.source[start..self.pos])
    }

    /// Consume everything up to (not including) `delim` or the end of input.
    pub fn eat_to(&mut self, delim: u8) -> &'src str {
        let start = self.pos;
        while self.peek().is_some_and(|b| b != delim) {
            self.pos += 1;
        }
        &self.source[start..self.pos]
    }
}

// --- Character classes ---

/// Anything at or below ASCII space counts as whitespace in markup.
pub fn is_space(b: u8) -> bool {
    b <= b' '
}

pub fn is_alpha(b: u8) -> bool {
    b.is_ascii_alphabetic()
}

pub fn is_alnum(b: u8) -> bool {
    b.is_ascii_alphanumeric()
}

/// Attribute names: letters, digits, `-` and `_` (the first byte is checked
/// to be a letter by the caller).
pub fn is_attr_name(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

/// Unquoted attribute values: `from=-1`, `type=text`, `width=1.5`.
pub fn is_attr_value(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b'.'
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Navigation
    // =========================================================================

    #[test]
    fn test_empty_source() {
        let cursor = Cursor::new("");
        assert!(cursor.is_at_end());
        assert_eq!(cursor.peek(), None);
        assert!(cursor.rest_is_whitespace());
    }

    #[test]
    fn test_peek_and_advance() {
        let mut cursor = Cursor::new("<a");
        assert_eq!(cursor.peek(), Some(b'<'));
        assert_eq!(cursor.peek_at(1), Some(b'a'));
        assert_eq!(cursor.peek_at(2), None);
        cursor.advance();
        assert_eq!(cursor.offset(), 1);
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.offset(), 2);
    }

    #[test]
    fn test_skip_whitespace_stops_at_content() {
        let mut cursor = Cursor::new(" \t\r\n x");
        cursor.skip_whitespace();
        assert_eq!(cursor.peek(), Some(b'x'));
        assert!(!cursor.rest_is_whitespace());
    }

    // =========================================================================
    // Consuming
    // =========================================================================

    #[test]
    fn test_eat_matches() {
        let mut cursor = Cursor::new("</div>");
        assert!(cursor.eat("</"));
        assert_eq!(cursor.offset(), 2);
    }

    #[test]
    fn test_eat_mismatch_does_not_move() {
        let mut cursor = Cursor::new("<div>");
        assert!(!cursor.eat("</"));
        assert_eq!(cursor.offset(), 0);
    }

    #[test]
    fn test_eat_while_alnum() {
        let mut cursor = Cursor::new("h1 class");
        assert_eq!(cursor.eat_while(is_alnum), "h1");
        assert_eq!(cursor.eat_while(is_alnum), "");
        assert_eq!(cursor.peek(), Some(b' '));
    }

    #[test]
    fn test_eat_while_stops_before_multibyte() {
        let mut cursor = Cursor::new("abé");
        assert_eq!(cursor.eat_while(is_alpha), "ab");
    }

    #[test]
    fn test_eat_until_delimiter() {
        let mut cursor = Cursor::new("hello <b>");
        assert_eq!(cursor.eat_until(b'<', |b| b == b'>'), Ok("hello "));
        assert_eq!(cursor.peek(), Some(b'<'));
    }

    #[test]
    fn test_eat_until_end_of_input() {
        let mut cursor = Cursor::new("tail");
        assert_eq!(cursor.eat_until(b'<', |_| false), Ok("tail"));
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_eat_to_quote() {
        let mut cursor = Cursor::new("a > b\" rest");
        assert_eq!(cursor.eat_to(b'"'), "a > b");
        assert_eq!(cursor.peek(), Some(b'"'));
        assert_eq!(cursor.eat_to(b'x'), "\" rest");
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_eat_until_rejected_byte() {
        let mut cursor = Cursor::new("a > b<");
        assert_eq!(cursor.eat_until(b'<', |b| b == b'>'), Err(2));
        assert_eq!(cursor.peek(), Some(b'>'));
    }

    // =========================================================================
    // Character classes
    // =========================================================================

    #[test]
    fn test_attribute_classes() {
        assert!(is_attr_name(b'-'));
        assert!(!is_attr_name(b'='));
        assert!(is_attr_value(b'-'));
        assert!(is_attr_value(b'.'));
        assert!(!is_attr_value(b'>'));
        assert!(!is_attr_value(b'"'));
    }
}
