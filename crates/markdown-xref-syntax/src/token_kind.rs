//! Token kinds and per-kind metadata for the Markdown token stream.
//!
//! Every byte in the source belongs to exactly one token, so the enum covers
//! structural markers as well as the generic text/trivia kinds that absorb
//! everything else.

use serde::Serialize;

/// All token kinds produced by the tokenizer.
///
/// We use SCREAMING_CASE following the rust-analyzer convention for syntax
/// kinds. The enum is `non_exhaustive`: consumers matching on it must keep a
/// wildcard arm for kinds added later.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[allow(non_camel_case_types)]
#[non_exhaustive]
pub enum TokenKind {
    // === Generic inline tokens ===
    /// Horizontal whitespace (spaces, tabs)
    WHITESPACE,
    /// Line ending (`\n`, `\r\n` or a lone `\r`)
    NEWLINE,
    /// Plain text, including raw code block content
    TEXT,
    /// Backslash followed by ASCII punctuation
    ESCAPED_CHAR,
    /// Run of one or more backticks (code span delimiter)
    BACKTICK_RUN,
    /// Run of `*` or `_`
    EMPHASIS_RUN,
    /// `[`
    LBRACKET,
    /// `]`
    RBRACKET,
    /// `(`
    LPAREN,
    /// `)`
    RPAREN,
    /// `!`
    BANG,
    /// `<...>` on a single line
    INLINE_HTML,
    /// Bytes that are not valid UTF-8
    OTHER,

    // === Block structure ===
    /// ATX heading marker (`#` to `######`)
    HEADING_MARKER,
    /// `>` at the start of a line
    BLOCKQUOTE_MARKER,
    /// `-`, `+` or `*` followed by whitespace
    LIST_BULLET,
    /// Digits followed by `.` or `)`
    LIST_NUMBER,
    /// A whole `---` / `***` / `___` line
    THEMATIC_BREAK,
    /// Opening or closing fence run (backticks or tildes)
    CODE_FENCE,
    /// Info string after an opening fence
    FENCE_INFO,
    /// Run of `=` or `-` underlining a setext heading
    SETEXT_UNDERLINE,
    /// Rest of a line starting with `<`
    HTML_BLOCK,
}

impl TokenKind {
    /// Returns true if this kind is trivia (whitespace/newlines).
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::NEWLINE)
    }

    /// Returns true for block-level structural markers.
    pub fn is_block_marker(self) -> bool {
        (self as u16) >= (Self::HEADING_MARKER as u16)
    }

    /// Returns true for the bracket/paren/bang tokens links are built from.
    pub fn is_link_punctuation(self) -> bool {
        matches!(
            self,
            Self::LBRACKET | Self::RBRACKET | Self::LPAREN | Self::RPAREN | Self::BANG
        )
    }
}

/// Kind-dependent payload attached to a token.
///
/// Each variant carries only what its token kind needs; most tokens carry
/// [`TokenMeta::None`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum TokenMeta {
    #[default]
    None,
    /// `HEADING_MARKER`: number of `#` characters.
    Heading { level: u8 },
    /// `LIST_BULLET`: the bullet byte.
    Bullet { marker: u8 },
    /// `LIST_NUMBER`: parsed value (saturating) and `.` or `)`.
    Ordered { number: u64, delimiter: u8 },
    /// `CODE_FENCE`: fence byte, run length, and whether this run closes a block.
    Fence {
        marker: u8,
        length: usize,
        closing: bool,
    },
    /// `BACKTICK_RUN` / `EMPHASIS_RUN`: run byte and length.
    Run { marker: u8, length: usize },
    /// `ESCAPED_CHAR`: the escaped punctuation byte.
    Escaped { byte: u8 },
    /// `THEMATIC_BREAK`: the repeated byte.
    ThematicBreak { marker: u8 },
    /// `SETEXT_UNDERLINE`: 1 for `=`, 2 for `-`.
    Setext { level: u8 },
}
