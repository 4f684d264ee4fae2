//! Block-start detection for the first non-indent byte of a line.
//!
//! Constructs are tried in a fixed priority order; the first one that
//! matches consumes (at least) its marker and is responsible for finishing
//! the rest of the line. Anything unmatched falls through to inline scanning.

use crate::token_kind::{TokenKind, TokenMeta};

use super::{Lexer, count_while, is_space_or_tab};

/// Where on the line block detection is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Scope {
    /// At the start of a physical line.
    Document,
    /// After one or more blockquote markers. Fences, setext underlines and
    /// HTML blocks are not recognised here.
    Quote,
}

/// Classify `[lexer.pos, eol)`. `indent` is the width of the indentation
/// already consumed on this line.
pub(super) fn line(lx: &mut Lexer<'_>, eol: usize, indent: usize, scope: Scope) {
    let document = scope == Scope::Document;
    let handled = match lx.src[lx.pos] {
        b'#' => heading(lx, eol),
        b'>' => {
            blockquote(lx, eol);
            true
        }
        marker @ (b'-' | b'+' | b'*') => {
            thematic_break(lx, eol, marker)
                || list_bullet(lx, eol, marker)
                || (marker == b'-' && document && setext_underline(lx, eol, marker))
        }
        b'_' => thematic_break(lx, eol, b'_'),
        marker @ (b'`' | b'~') if document => fenced_code(lx, eol, indent, marker),
        b'=' if document => setext_underline(lx, eol, b'='),
        b'<' if document => {
            lx.push(TokenKind::HTML_BLOCK, eol, TokenMeta::None);
            true
        }
        b'0'..=b'9' => ordered_marker(lx, eol),
        _ => false,
    };

    if !handled {
        lx.inline(eol);
    }
}

/// `#`×1–6 followed by space, tab or end of line.
fn heading(lx: &mut Lexer<'_>, eol: usize) -> bool {
    let run = count_while(&lx.src[lx.pos..eol], |b| b == b'#');
    let after = lx.pos + run;
    if run > 6 || (after < eol && !is_space_or_tab(lx.src[after])) {
        return false;
    }

    lx.push(
        TokenKind::HEADING_MARKER,
        after,
        TokenMeta::Heading { level: run as u8 },
    );
    eat_one_space(lx, eol);
    lx.inline(eol);
    true
}

/// `>` plus an optional single space, then block detection again for the
/// quoted remainder.
fn blockquote(lx: &mut Lexer<'_>, eol: usize) {
    lx.push(TokenKind::BLOCKQUOTE_MARKER, lx.pos + 1, TokenMeta::None);
    eat_one_space(lx, eol);
    let indent = lx.eat_whitespace(eol);
    if lx.pos < eol {
        line(lx, eol, indent, Scope::Quote);
    }
}

/// A whole line of ≥3 `marker` bytes, optionally separated by spaces/tabs.
fn thematic_break(lx: &mut Lexer<'_>, eol: usize, marker: u8) -> bool {
    let rest = &lx.src[lx.pos..eol];
    let mut count = 0;
    for &b in rest {
        if b == marker {
            count += 1;
        } else if !is_space_or_tab(b) {
            return false;
        }
    }
    if count < 3 {
        return false;
    }

    lx.push(
        TokenKind::THEMATIC_BREAK,
        eol,
        TokenMeta::ThematicBreak { marker },
    );
    true
}

/// `-`, `+` or `*` directly followed by a space or tab.
fn list_bullet(lx: &mut Lexer<'_>, eol: usize, marker: u8) -> bool {
    let next = lx.pos + 1;
    if next >= eol || !is_space_or_tab(lx.src[next]) {
        return false;
    }

    lx.push(TokenKind::LIST_BULLET, next, TokenMeta::Bullet { marker });
    lx.inline(eol);
    true
}

/// A run of `=` or `-` reaching the end of the line, trailing whitespace allowed.
fn setext_underline(lx: &mut Lexer<'_>, eol: usize, marker: u8) -> bool {
    let run_end = lx.pos + count_while(&lx.src[lx.pos..eol], |b| b == marker);
    if !lx.src[run_end..eol].iter().all(|&b| is_space_or_tab(b)) {
        return false;
    }

    let level = if marker == b'=' { 1 } else { 2 };
    lx.push(
        TokenKind::SETEXT_UNDERLINE,
        run_end,
        TokenMeta::Setext { level },
    );
    lx.eat_whitespace(eol);
    true
}

/// ASCII digits, then `.` or `)`, then a space or tab.
fn ordered_marker(lx: &mut Lexer<'_>, eol: usize) -> bool {
    let digits = count_while(&lx.src[lx.pos..eol], |b| b.is_ascii_digit());
    let delim_at = lx.pos + digits;
    let Some(&delimiter) = lx.src[..eol].get(delim_at) else {
        return false;
    };
    if delimiter != b'.' && delimiter != b')' {
        return false;
    }
    match lx.src[..eol].get(delim_at + 1) {
        Some(&b) if is_space_or_tab(b) => {}
        _ => return false,
    }

    let number = lx.src[lx.pos..delim_at].iter().fold(0u64, |n, &d| {
        n.saturating_mul(10).saturating_add(u64::from(d - b'0'))
    });
    lx.push(
        TokenKind::LIST_NUMBER,
        delim_at + 1,
        TokenMeta::Ordered { number, delimiter },
    );
    eat_one_space(lx, eol);
    lx.inline(eol);
    true
}

/// Opening fence of ≥3 backticks or tildes, its raw content, and its closer.
///
/// Leaves `pos` at the end of the closing line's content (or at end of input
/// for an unterminated fence) so the driver emits the final newline.
fn fenced_code(lx: &mut Lexer<'_>, eol: usize, indent: usize, marker: u8) -> bool {
    let length = count_while(&lx.src[lx.pos..eol], |b| b == marker);
    if length < 3 {
        return false;
    }

    lx.push(
        TokenKind::CODE_FENCE,
        lx.pos + length,
        TokenMeta::Fence {
            marker,
            length,
            closing: false,
        },
    );
    lx.eat_whitespace(eol);
    lx.push(TokenKind::FENCE_INFO, eol, TokenMeta::None);

    let max_indent = indent.max(3);
    loop {
        lx.eat_newline();
        if lx.pos >= lx.src.len() {
            return true;
        }

        let line_end = lx.line_end(lx.pos);
        if let Some((lead, run)) = closing_fence(&lx.src[lx.pos..line_end], marker, length, max_indent)
        {
            lx.push(TokenKind::WHITESPACE, lx.pos + lead, TokenMeta::None);
            lx.push(
                TokenKind::CODE_FENCE,
                lx.pos + run,
                TokenMeta::Fence {
                    marker,
                    length: run,
                    closing: true,
                },
            );
            lx.eat_whitespace(line_end);
            return true;
        }

        lx.push(TokenKind::TEXT, line_end, TokenMeta::None);
    }
}

/// If `line` closes a fence, returns (indent length, run length).
fn closing_fence(line: &[u8], marker: u8, min_len: usize, max_indent: usize) -> Option<(usize, usize)> {
    let lead = count_while(line, |b| b == b' ');
    if lead > max_indent {
        return None;
    }
    let run = count_while(&line[lead..], |b| b == marker);
    if run < min_len {
        return None;
    }
    line[lead + run..]
        .iter()
        .all(|&b| is_space_or_tab(b))
        .then_some((lead, run))
}

fn eat_one_space(lx: &mut Lexer<'_>, eol: usize) {
    if lx.pos < eol && is_space_or_tab(lx.src[lx.pos]) {
        lx.push(TokenKind::WHITESPACE, lx.pos + 1, TokenMeta::None);
    }
}
