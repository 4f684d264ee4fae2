//! # markdown-xref-syntax
//!
//! A lossless byte tokenizer and line index for Markdown, the bottom layer
//! of the `markdown-xref` document model.
//!
//! ## What "Lossless" Means Here
//!
//! Every byte of the input belongs to exactly one token and the tokens are
//! strictly contiguous. Nothing is skipped, normalised or decoded, so:
//!
//! - **Any span slices back to the exact source**, including invalid UTF-8
//! - **Positions are exact**: a node's byte range is just
//!   `tokens[first].start .. tokens[last].end`
//! - **The tokenizer cannot fail**: malformed Markdown degrades to text
//!
//! ## Architecture Overview
//!
//! ```text
//! Content bytes ──┬──> LineIndex   (line records, offset <-> line/column)
//!                 └──> tokenize()  (Vec<Token>, contiguous)
//!                         │
//!                         ├─ block layer:  headings, quotes, lists, fences...
//!                         └─ inline layer: Logos lexer over the rest of a line
//! ```
//!
//! ### 1. Line index ([`line_index`] module)
//!
//! ```text
//! "ab\ncd" → [{start: 0, content_end: 2, line_end: 3},
//!             {start: 3, content_end: 5, line_end: 5}]
//! ```
//!
//! ### 2. Tokenizer ([`lexer`] module)
//!
//! ```text
//! "# Hello\n" → [HEADING_MARKER, WHITESPACE, TEXT("Hello"), NEWLINE]
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! markdown-xref-syntax/
//! ├── lib.rs          # This file - public API and integration tests
//! ├── token_kind.rs   # TokenKind enum and TokenMeta payloads
//! ├── span.rs         # Byte spans
//! ├── line_index.rs   # LineRecord, Position, LineIndex
//! └── lexer/
//!     ├── mod.rs      # Driver, Token, tokenize()
//!     ├── block.rs    # Block-start detection, fenced code
//!     └── inline.rs   # Logos inline scanner
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use markdown_xref_syntax::{tokenize, LineIndex, Position, TokenKind};
//!
//! let content = b"# Hello\nworld\n";
//! let tokens = tokenize(content);
//! assert_eq!(tokens[0].kind, TokenKind::HEADING_MARKER);
//!
//! let lines = LineIndex::new(content);
//! assert_eq!(lines.offset_to_position(8), Position::new(2, 1));
//! ```

pub mod lexer;
pub mod line_index;
pub mod span;
pub mod token_kind;

pub use lexer::{Token, tokenize};
pub use line_index::{LineIndex, LineRecord, Position, PositionError, SourceRange};
pub use span::Span;
pub use token_kind::{TokenKind, TokenMeta};
