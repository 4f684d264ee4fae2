//! # Snapshot - One Immutable Document Version
//!
//! A [`Snapshot`] owns the content bytes, their line index, the token
//! stream and the syntax tree built over it. It is never mutated after
//! assembly; an edit produces a new snapshot.
//!
//! ## Positions
//!
//! Nodes store token ranges, not offsets. Positions are derived on demand:
//!
//! ```text
//! node.token_range = 2..=4
//!   → tokens[2].start .. tokens[4].end      (byte span)
//!   → LineIndex binary search               (1-based line/column)
//! ```
//!
//! Nodes without a range, nodes stamped by a different snapshot and unknown
//! ids all report [`SourceRange::INVALID`].
//!
//! ## Identity
//!
//! Each snapshot gets a process-unique [`SnapshotId`] which is stamped on
//! its nodes as their owner at assembly time.

pub mod invariants;
mod mapper;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use markdown_xref_config::MarkdownOptions;
use markdown_xref_syntax::{LineIndex, SourceRange, Span, Token, tokenize};
use serde::Serialize;
use thiserror::Error;

use crate::tree::{NodeId, Tree};

static NEXT_SNAPSHOT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SnapshotId(u64);

impl SnapshotId {
    fn next() -> Self {
        Self(NEXT_SNAPSHOT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("token {index} starts at {found}, expected {expected}")]
    NonContiguousTokens {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("token {index} is empty or reversed ({start}..{end})")]
    EmptyToken {
        index: usize,
        start: usize,
        end: usize,
    },
    #[error("tokens end at {end}, content is {len} bytes")]
    IncompleteCoverage { end: usize, len: usize },
    #[error("node {node:?} covers tokens {first}..={last}, only {token_count} tokens exist")]
    TokenRangeOutOfBounds {
        node: NodeId,
        first: usize,
        last: usize,
        token_count: usize,
    },
    #[error("Failed to read document at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug)]
pub struct Snapshot {
    id: SnapshotId,
    content: Vec<u8>,
    lines: LineIndex,
    tokens: Vec<Token>,
    tree: Tree,
}

impl Snapshot {
    /// Tokenize and map `content` with default parser options.
    pub fn from_bytes(content: impl Into<Vec<u8>>) -> Self {
        Self::from_bytes_with(content, &MarkdownOptions::default())
    }

    pub fn from_bytes_with(content: impl Into<Vec<u8>>, options: &MarkdownOptions) -> Self {
        let content = content.into();
        let tokens = tokenize(&content);
        let tree = mapper::map(&content, &tokens, options);
        Self::assemble(content, tokens, tree)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        Self::from_path_with(path, &MarkdownOptions::default())
    }

    pub fn from_path_with<P: AsRef<Path>>(
        path: P,
        options: &MarkdownOptions,
    ) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let content = std::fs::read(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_bytes_with(content, options))
    }

    /// Assemble a snapshot from a token stream and tree built elsewhere.
    ///
    /// The tokens must cover `content` contiguously and every node's token
    /// range must lie inside the token list. Nodes already stamped by
    /// another snapshot keep that owner and so report invalid positions.
    pub fn from_parts(
        content: impl Into<Vec<u8>>,
        tokens: Vec<Token>,
        tree: Tree,
    ) -> Result<Self, SnapshotError> {
        let content = content.into();
        invariants::validate_tokens(&tokens, content.len())?;
        invariants::validate_token_ranges(&tree, tokens.len())?;
        Ok(Self::assemble(content, tokens, tree))
    }

    fn assemble(content: Vec<u8>, tokens: Vec<Token>, mut tree: Tree) -> Self {
        let id = SnapshotId::next();
        tree.stamp_owner(id);
        let lines = LineIndex::new(&content);
        debug!(
            "assembled snapshot {:?}: {} bytes, {} lines, {} tokens, {} nodes",
            id,
            content.len(),
            lines.line_count(),
            tokens.len(),
            tree.len()
        );
        Self {
            id,
            content,
            lines,
            tokens,
            tree,
        }
    }

    pub fn id(&self) -> SnapshotId {
        self.id
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Byte span of a node owned by this snapshot.
    pub fn span(&self, node: NodeId) -> Option<Span> {
        let data = self.tree.get(node)?;
        if data.owner() != Some(self.id) {
            return None;
        }
        let range = data.token_range?;
        let first = self.tokens.get(range.first)?;
        let last = self.tokens.get(range.last)?;
        (first.start <= last.end).then(|| Span::new(first.start, last.end))
    }

    /// Line/column range of a node, or [`SourceRange::INVALID`].
    pub fn position(&self, node: NodeId) -> SourceRange {
        self.span(node)
            .map_or(SourceRange::INVALID, |span| self.lines.span_to_range(span))
    }

    /// Raw source bytes of a node.
    pub fn node_source(&self, node: NodeId) -> Option<&[u8]> {
        self.span(node).map(|span| span.slice(&self.content))
    }

    /// Plain text of a node: text and code literals of its subtree, with
    /// line breaks as single spaces.
    pub fn node_text(&self, node: NodeId) -> String {
        self.tree
            .descendants(node)
            .filter_map(|id| self.tree.kind(id).and_then(|k| k.literal()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{NodeKind, TokenRange};
    use markdown_xref_syntax::Position;
    use pretty_assertions::assert_eq;

    fn first_of_kind(snapshot: &Snapshot, pred: impl Fn(&NodeKind) -> bool) -> NodeId {
        let tree = snapshot.tree();
        tree.descendants(tree.root())
            .find(|&id| tree.kind(id).is_some_and(&pred))
            .unwrap()
    }

    #[test]
    fn snapshot_ids_are_unique() {
        let a = Snapshot::from_bytes("x");
        let b = Snapshot::from_bytes("x");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn heading_position() {
        let snapshot = Snapshot::from_bytes("intro\n\n## Title\n");
        let heading = first_of_kind(&snapshot, NodeKind::is_heading);
        let range = snapshot.position(heading);
        assert_eq!(range.start, Position::new(3, 1));
        assert!(snapshot.node_source(heading).unwrap().starts_with(b"## Title"));
        assert_eq!(snapshot.node_text(heading), "Title");
    }

    #[test]
    fn node_text_joins_breaks_with_spaces() {
        let snapshot = Snapshot::from_bytes("a *b*\n`c`");
        let paragraph = first_of_kind(&snapshot, |k| *k == NodeKind::Paragraph);
        assert_eq!(snapshot.node_text(paragraph), "a b c");
    }

    #[test]
    fn unknown_and_unranged_nodes_are_invalid() {
        let snapshot = Snapshot::from_bytes("text");
        assert_eq!(snapshot.position(NodeId::from_index(999)), SourceRange::INVALID);

        let mut tree = Tree::default();
        let synthetic = tree.new_node(NodeKind::Paragraph, None);
        tree.append_child(tree.root(), synthetic).unwrap();
        let snapshot = Snapshot::from_parts("text", tokenize(b"text"), tree).unwrap();
        assert_eq!(snapshot.position(synthetic), SourceRange::INVALID);
        assert_eq!(snapshot.node_source(synthetic), None);
    }

    #[test]
    fn nodes_owned_by_another_snapshot_are_invalid() {
        let original = Snapshot::from_bytes("# A\n");
        let reused = Snapshot::from_parts(
            original.content().to_vec(),
            original.tokens().to_vec(),
            original.tree().clone(),
        )
        .unwrap();
        let heading = first_of_kind(&reused, NodeKind::is_heading);
        assert!(original.position(heading).is_valid());
        assert_eq!(reused.position(heading), SourceRange::INVALID);
    }

    #[test]
    fn from_parts_rejects_gappy_tokens() {
        let mut tokens = tokenize(b"a b");
        tokens.remove(1);
        let err = Snapshot::from_parts("a b", tokens, Tree::default()).unwrap_err();
        assert!(matches!(err, SnapshotError::NonContiguousTokens { index: 1, .. }));
    }

    #[test]
    fn from_parts_rejects_short_coverage() {
        let tokens = tokenize(b"ab");
        let err = Snapshot::from_parts("abc", tokens, Tree::default()).unwrap_err();
        assert!(matches!(err, SnapshotError::IncompleteCoverage { end: 2, len: 3 }));
    }

    #[test]
    fn from_parts_rejects_out_of_range_nodes() {
        let mut tree = Tree::default();
        let node = tree.new_node(NodeKind::Paragraph, Some(TokenRange::new(0, 5)));
        tree.append_child(tree.root(), node).unwrap();
        let err = Snapshot::from_parts("a", tokenize(b"a"), tree).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::TokenRangeOutOfBounds { last: 5, token_count: 1, .. }
        ));
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("doc.md");
        std::fs::write(&path, "# On disk\n").unwrap();

        let snapshot = Snapshot::from_path(&path).unwrap();
        assert_eq!(snapshot.content(), b"# On disk\n");

        let missing = Snapshot::from_path(dir.path().join("missing.md")).unwrap_err();
        assert!(matches!(missing, SnapshotError::Io { .. }));
        assert!(missing.to_string().contains("missing.md"));
    }

    #[test]
    fn invalid_utf8_is_accepted() {
        let snapshot = Snapshot::from_bytes(&b"# T\xffitle\n\n[a\xfe](b)\n"[..]);
        invariants::check(&snapshot);
        assert!(snapshot.tokens().iter().any(|t| t.kind == markdown_xref_syntax::TokenKind::OTHER));
    }
}
