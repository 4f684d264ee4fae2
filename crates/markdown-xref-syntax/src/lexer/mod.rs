//! # Lexer - Tokenizing Markdown Bytes
//!
//! This module turns raw document bytes into a flat token stream in a single
//! line-oriented pass.
//!
//! ## The Lossless Guarantee
//!
//! The most important property of this lexer is that **every byte in the input
//! appears in exactly one token**. We never skip or discard bytes, and tokens
//! are strictly contiguous:
//!
//! ```
//! use markdown_xref_syntax::tokenize;
//!
//! let input = b"# Hello, world!\n";
//! let tokens = tokenize(input);
//!
//! assert_eq!(tokens.first().map(|t| t.start), Some(0));
//! assert_eq!(tokens.last().map(|t| t.end), Some(input.len()));
//! assert!(tokens.windows(2).all(|w| w[0].end == w[1].start));
//! ```
//!
//! ## Two Layers
//!
//! Each line is handled in two steps:
//!
//! 1. **Block detection** ([`block`]): leading indentation becomes a
//!    `WHITESPACE` token, then the first byte decides whether the line opens a
//!    heading, blockquote, list item, thematic break, fence, setext underline
//!    or HTML block. Fenced code swallows its raw content lines here.
//! 2. **Inline scanning** ([`inline`]): whatever is left of the line is split
//!    with a [Logos] lexer into text, whitespace, escapes, backtick and
//!    emphasis runs, link punctuation and inline HTML.
//!
//! Line terminators are always emitted as their own `NEWLINE` token by the
//! driver, never by either layer.
//!
//! ## Failure Semantics
//!
//! There are none. Unrecognised constructs degrade to `TEXT`; bytes that are
//! not valid UTF-8 become `OTHER`.
//!
//! [Logos]: https://docs.rs/logos

mod block;
mod inline;

use crate::span::Span;
use crate::token_kind::{TokenKind, TokenMeta};

/// A classified byte range of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
    pub meta: TokenMeta,
}

impl Token {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The bytes this token covers.
    pub fn text<'a>(&self, content: &'a [u8]) -> &'a [u8] {
        self.span().slice(content)
    }
}

/// Tokenize `content` into a contiguous, gap-free token sequence.
///
/// Returns an empty vector for empty input. Never fails or panics.
pub fn tokenize(content: &[u8]) -> Vec<Token> {
    let mut lexer = Lexer::new(content);
    while lexer.pos < content.len() {
        lexer.line();
    }
    lexer.tokens
}

/// Lexer state shared by the block and inline layers.
pub(crate) struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a [u8]) -> Self {
        Self {
            src,
            pos: 0,
            // Markdown averages a token every handful of bytes
            tokens: Vec::with_capacity(src.len() / 4 + 1),
        }
    }

    /// Lex one line starting at `pos` (which is always at a line start).
    fn line(&mut self) {
        let eol = self.line_end(self.pos);
        let indent = self.eat_whitespace(eol);
        if self.pos < eol {
            block::line(self, eol, indent, block::Scope::Document);
        }
        self.eat_newline();
    }

    /// Emit `[pos, end)` as one token. Empty ranges emit nothing.
    fn push(&mut self, kind: TokenKind, end: usize, meta: TokenMeta) {
        if end <= self.pos {
            return;
        }
        self.tokens.push(Token {
            kind,
            start: self.pos,
            end,
            meta,
        });
        self.pos = end;
    }

    /// Like [`push`](Self::push) for `TEXT`, extending a directly preceding
    /// `TEXT` token instead of starting a new one.
    fn push_text(&mut self, end: usize) {
        if end <= self.pos {
            return;
        }
        match self.tokens.last_mut() {
            Some(last) if last.kind == TokenKind::TEXT && last.end == self.pos => {
                last.end = end;
                self.pos = end;
            }
            _ => self.push(TokenKind::TEXT, end, TokenMeta::None),
        }
    }

    /// Offset of the first `\r` or `\n` at or after `from`, or the end of input.
    fn line_end(&self, from: usize) -> usize {
        self.src[from..]
            .iter()
            .position(|&b| b == b'\n' || b == b'\r')
            .map_or(self.src.len(), |i| from + i)
    }

    /// Consume a run of spaces/tabs up to `limit`; returns its length.
    fn eat_whitespace(&mut self, limit: usize) -> usize {
        let start = self.pos;
        let end = start + count_while(&self.src[start..limit], is_space_or_tab);
        self.push(TokenKind::WHITESPACE, end, TokenMeta::None);
        end - start
    }

    /// Consume `\n`, `\r\n` or `\r` if one starts at `pos`.
    fn eat_newline(&mut self) {
        let end = match self.src.get(self.pos) {
            Some(b'\n') => self.pos + 1,
            Some(b'\r') if self.src.get(self.pos + 1) == Some(&b'\n') => self.pos + 2,
            Some(b'\r') => self.pos + 1,
            _ => return,
        };
        self.push(TokenKind::NEWLINE, end, TokenMeta::None);
    }

    /// Inline-scan `[pos, end)`.
    fn inline(&mut self, end: usize) {
        inline::scan(self, end);
    }
}

pub(crate) fn is_space_or_tab(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

pub(crate) fn count_while(bytes: &[u8], pred: impl Fn(u8) -> bool) -> usize {
    bytes.iter().take_while(|&&b| pred(b)).count()
}
