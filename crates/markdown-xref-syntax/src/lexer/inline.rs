//! Inline scanning with a [Logos] lexer.
//!
//! The remainder of a line is split into UTF-8 chunks first: valid text is
//! fed to Logos, invalid byte sequences become `OTHER` tokens. Logos errors
//! (a lone `\`, an unterminated `<`) degrade to `TEXT`.
//!
//! [Logos]: https://docs.rs/logos

use logos::Logos;

use crate::token_kind::{TokenKind, TokenMeta};

use super::Lexer;

/// Token kinds produced by the Logos inline lexer.
///
/// This enum exists separately from [`TokenKind`] because Logos needs to
/// derive on it. Line terminators never reach it: the driver cuts input at
/// the end of each line.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum InlineToken {
    /// Horizontal whitespace (spaces, tabs)
    #[regex(r"[ \t]+")]
    Whitespace,

    /// Backslash escape of an ASCII punctuation character
    #[regex(r"\\[\x21-\x2F\x3A-\x40\x5B-\x60\x7B-\x7E]")]
    Escaped,

    /// Code span delimiter
    #[regex(r"`+")]
    Backticks,

    #[regex(r"\*+")]
    Stars,

    #[regex(r"_+")]
    Underscores,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("!")]
    Bang,

    /// `<...>` closed on the same line
    #[regex(r"<[^>\r\n]*>")]
    Html,

    /// A `<` that does not open inline HTML
    #[token("<")]
    Lt,

    /// Plain text - anything not matched by other rules
    #[regex(r"[^ \t\r\n\\`*_\[\]()!<]+")]
    Text,
}

/// Scan `[lx.pos, end)` into inline tokens.
pub(super) fn scan(lx: &mut Lexer<'_>, end: usize) {
    let src = lx.src;
    while lx.pos < end {
        let chunk = match src[lx.pos..end].utf8_chunks().next() {
            Some(chunk) => chunk,
            None => return,
        };

        let base = lx.pos;
        let valid = chunk.valid();
        if !valid.is_empty() {
            scan_str(lx, base, valid);
        }

        let invalid_len = chunk.invalid().len();
        if invalid_len > 0 {
            lx.push(TokenKind::OTHER, lx.pos + invalid_len, TokenMeta::None);
        }
    }
}

fn scan_str(lx: &mut Lexer<'_>, base: usize, text: &str) {
    let mut lexer = InlineToken::lexer(text);
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let end = base + span.end;
        let slice = &text.as_bytes()[span.start..span.end];

        match result {
            Ok(InlineToken::Whitespace) => lx.push(TokenKind::WHITESPACE, end, TokenMeta::None),
            Ok(InlineToken::Escaped) => lx.push(
                TokenKind::ESCAPED_CHAR,
                end,
                TokenMeta::Escaped { byte: slice[1] },
            ),
            Ok(InlineToken::Backticks) => lx.push(TokenKind::BACKTICK_RUN, end, run_meta(slice)),
            Ok(InlineToken::Stars | InlineToken::Underscores) => {
                lx.push(TokenKind::EMPHASIS_RUN, end, run_meta(slice))
            }
            Ok(InlineToken::LBracket) => lx.push(TokenKind::LBRACKET, end, TokenMeta::None),
            Ok(InlineToken::RBracket) => lx.push(TokenKind::RBRACKET, end, TokenMeta::None),
            Ok(InlineToken::LParen) => lx.push(TokenKind::LPAREN, end, TokenMeta::None),
            Ok(InlineToken::RParen) => lx.push(TokenKind::RPAREN, end, TokenMeta::None),
            Ok(InlineToken::Bang) => lx.push(TokenKind::BANG, end, TokenMeta::None),
            Ok(InlineToken::Html) => lx.push(TokenKind::INLINE_HTML, end, TokenMeta::None),
            // Logos error means an unrecognised or unterminated construct - treat as TEXT
            Ok(InlineToken::Text | InlineToken::Lt) | Err(()) => lx.push_text(end),
        }
    }
}

fn run_meta(slice: &[u8]) -> TokenMeta {
    TokenMeta::Run {
        marker: slice[0],
        length: slice.len(),
    }
}
