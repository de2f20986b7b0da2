use serde::Serialize;

/// A 1-based line/column position in source text.
///
/// Positions are not tracked while scanning. They are computed on demand from
/// a byte offset, which only happens when a diagnostic is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Locate a byte offset by counting the newlines before it.
    /// Offsets past the end are clamped to the end of the source.
    pub fn locate(source: &str, offset: usize) -> Self {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }

        let before = &source[..offset];
        let line = before.bytes().filter(|&b| b == b'\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;

        Self { line, column }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_of_source() {
        assert_eq!(Position::locate("abc", 0), Position::new(1, 1));
    }

    #[test]
    fn test_same_line() {
        assert_eq!(Position::locate("<div>", 4), Position::new(1, 5));
    }

    #[test]
    fn test_after_newlines() {
        let source = "<div>\n  <p>\n    x";
        assert_eq!(Position::locate(source, 6), Position::new(2, 1));
        assert_eq!(Position::locate(source, 8), Position::new(2, 3));
        assert_eq!(Position::locate(source, 16), Position::new(3, 5));
    }

    #[test]
    fn test_columns_count_characters() {
        // "é" is two bytes but one column
        assert_eq!(Position::locate("é<", 2), Position::new(1, 2));
    }

    #[test]
    fn test_offset_clamped() {
        assert_eq!(Position::locate("ab", 99), Position::new(1, 3));
    }
}
