//! Tessera Lexer
//!
//! Low-level scanning shared by the parser and the renderer:
//! a byte cursor with backtracking over markup source, lazy line/column
//! positions for diagnostics, and the template-text scanner that splits
//! text into literal runs and `{{placeholder}}` keys.
//!
//! # Example
//!
//! ```
//! use tessera_lexer::{Segment, TemplateText};
//!
//! let text = TemplateText::scan("Hello {{name}}!");
//! assert_eq!(
//!     text.segments(),
//!     &[
//!         Segment::Literal("Hello "),
//!         Segment::Placeholder("name"),
//!         Segment::Literal("!"),
//!     ]
//! );
//! ```

pub mod cursor;
pub mod position;
pub mod template;

pub use cursor::Cursor;
pub use position::Position;
pub use template::{unclosed_brace, Segment, TemplateText};
