//! # Line Index - Byte Offsets to Line/Column Positions
//!
//! The line index splits content into [`LineRecord`]s once and answers
//! position queries with a binary search, so converting a byte offset is
//! O(log n) regardless of document size.
//!
//! ```text
//! Content: "ab\r\ncd"
//!           0 1 2 3 4 5
//!
//! records = [ {start: 0, content_end: 2, line_end: 4},
//!             {start: 4, content_end: 6, line_end: 6} ]
//!
//! offset_to_position(5) → line 2, column 2
//! offset_to_position(3) → line 1, column 3   (inside the terminator: clamped)
//! ```
//!
//! Lines and columns are 1-based; columns count bytes. Line 0 is reserved
//! for [`Position::INVALID`].

use serde::Serialize;
use thiserror::Error;

use crate::span::Span;

/// One physical line of the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineRecord {
    /// Offset of the first byte of the line.
    pub start: usize,
    /// Offset just past the last content byte (before the terminator).
    pub content_end: usize,
    /// Offset just past the terminator (equals `content_end` on the last line).
    pub line_end: usize,
}

impl LineRecord {
    /// The content bytes of this line, without the terminator.
    pub fn content(self) -> Span {
        Span::new(self.start, self.content_end)
    }

    /// The full line including the terminator.
    pub fn full(self) -> Span {
        Span::new(self.start, self.line_end)
    }
}

/// A 1-based line/column position. Columns count bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Returned for nodes without a source span; `line == 0` marks it.
    pub const INVALID: Position = Position { line: 0, column: 0 };

    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub fn is_valid(self) -> bool {
        self.line > 0
    }
}

/// A start/end pair of positions. The end is exclusive, like [`Span`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SourceRange {
    pub start: Position,
    pub end: Position,
}

impl SourceRange {
    pub const INVALID: SourceRange = SourceRange {
        start: Position::INVALID,
        end: Position::INVALID,
    };

    pub fn is_valid(self) -> bool {
        self.start.is_valid() && self.end.is_valid()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("line {line} is out of range (document has {line_count} lines)")]
    LineOutOfRange { line: usize, line_count: usize },
    #[error("column must be at least 1")]
    ColumnZero,
    #[error("column {column} is past the end of line {line} (last valid column is {max})")]
    ColumnOutOfRange {
        line: usize,
        column: usize,
        max: usize,
    },
}

/// Line records for one content buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    records: Vec<LineRecord>,
    len: usize,
}

impl LineIndex {
    /// Splits `content` at `\n`, `\r\n` and lone `\r`.
    ///
    /// Always produces at least one record; content ending in a terminator
    /// gets a trailing empty record.
    pub fn new(content: &[u8]) -> Self {
        let mut records = Vec::with_capacity(content.len() / 40 + 1);
        let mut start = 0;
        let mut i = 0;

        while i < content.len() {
            match content[i] {
                b'\n' => {
                    records.push(LineRecord {
                        start,
                        content_end: i,
                        line_end: i + 1,
                    });
                    i += 1;
                    start = i;
                }
                b'\r' => {
                    let line_end = if content.get(i + 1) == Some(&b'\n') {
                        i + 2
                    } else {
                        i + 1
                    };
                    records.push(LineRecord {
                        start,
                        content_end: i,
                        line_end,
                    });
                    i = line_end;
                    start = i;
                }
                _ => i += 1,
            }
        }

        records.push(LineRecord {
            start,
            content_end: content.len(),
            line_end: content.len(),
        });

        Self {
            records,
            len: content.len(),
        }
    }

    pub fn records(&self) -> &[LineRecord] {
        &self.records
    }

    pub fn line_count(&self) -> usize {
        self.records.len()
    }

    /// Length of the indexed content in bytes.
    pub fn content_len(&self) -> usize {
        self.len
    }

    /// Record for a 1-based line number.
    pub fn record(&self, line: usize) -> Option<LineRecord> {
        line.checked_sub(1).and_then(|i| self.records.get(i)).copied()
    }

    /// 0-based index of the line containing `offset`, clamped to the last line.
    pub fn line_index_of(&self, offset: usize) -> usize {
        let idx = self.records.partition_point(|r| r.line_end <= offset);
        idx.min(self.records.len() - 1)
    }

    /// Converts a byte offset into a 1-based position.
    ///
    /// Offsets past the end clamp to the last line; offsets inside a line
    /// terminator clamp to one past the last content byte of that line.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let idx = self.line_index_of(offset);
        let record = self.records[idx];
        let clamped = offset.clamp(record.start, record.content_end);
        Position {
            line: idx + 1,
            column: clamped - record.start + 1,
        }
    }

    /// Converts a 1-based position back into a byte offset.
    ///
    /// The column may address one past the last content byte (a cursor at
    /// the end of the line) but nothing further.
    pub fn position_to_offset(&self, position: Position) -> Result<usize, PositionError> {
        let record = self
            .record(position.line)
            .ok_or(PositionError::LineOutOfRange {
                line: position.line,
                line_count: self.line_count(),
            })?;

        if position.column == 0 {
            return Err(PositionError::ColumnZero);
        }

        let max = record.content_end - record.start + 1;
        if position.column > max {
            return Err(PositionError::ColumnOutOfRange {
                line: position.line,
                column: position.column,
                max,
            });
        }

        Ok(record.start + position.column - 1)
    }

    /// Converts a byte span into a start/end position pair.
    pub fn span_to_range(&self, span: Span) -> SourceRange {
        SourceRange {
            start: self.offset_to_position(span.start),
            end: self.offset_to_position(span.end),
        }
    }
}
