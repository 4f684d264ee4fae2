//! Structural invariants of tokens, trees and snapshots.
//!
//! The `validate_*` functions return errors and back [`Snapshot::from_parts`].
//! [`check`] and [`check_tree`] panic on the first violation and are meant
//! for tests and fuzzing.
//!
//! [`Snapshot::from_parts`]: super::Snapshot::from_parts

use markdown_xref_syntax::Token;

use super::{Snapshot, SnapshotError};
use crate::tree::{NodeId, Tree};

/// Tokens are non-empty, contiguous and cover `[0, len)` exactly.
pub fn validate_tokens(tokens: &[Token], len: usize) -> Result<(), SnapshotError> {
    let mut expected = 0;
    for (index, token) in tokens.iter().enumerate() {
        if token.start != expected {
            return Err(SnapshotError::NonContiguousTokens {
                index,
                expected,
                found: token.start,
            });
        }
        if token.end <= token.start {
            return Err(SnapshotError::EmptyToken {
                index,
                start: token.start,
                end: token.end,
            });
        }
        expected = token.end;
    }
    if expected != len {
        return Err(SnapshotError::IncompleteCoverage { end: expected, len });
    }
    Ok(())
}

/// Every node's token range is ordered and inside `[0, token_count)`.
pub fn validate_token_ranges(tree: &Tree, token_count: usize) -> Result<(), SnapshotError> {
    for id in tree.ids() {
        let Some(range) = tree.get(id).and_then(|n| n.token_range) else {
            continue;
        };
        if range.first > range.last || range.last >= token_count {
            return Err(SnapshotError::TokenRangeOutOfBounds {
                node: id,
                first: range.first,
                last: range.last,
                token_count,
            });
        }
    }
    Ok(())
}

/// Panics unless parent, child and sibling links agree everywhere.
pub fn check_tree(tree: &Tree) {
    let Some(root_node) = tree.get(tree.root()) else {
        panic!("tree has no root node");
    };
    assert!(root_node.is_detached(), "root has a parent or siblings");

    for id in tree.ids() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        let mut prev: Option<NodeId> = None;
        let mut count = 0usize;
        for child in tree.children(id) {
            let Some(child_node) = tree.get(child) else {
                panic!("{id:?} links to unknown child {child:?}");
            };
            assert_eq!(child_node.parent(), Some(id), "{child:?} under {id:?} has wrong parent");
            assert_eq!(child_node.prev_sibling(), prev, "{child:?} has wrong prev link");
            prev = Some(child);
            count += 1;
            assert!(count <= tree.len(), "sibling loop under {id:?}");
        }
        assert_eq!(node.last_child(), prev, "{id:?} has wrong last_child");
        assert_eq!(node.first_child().is_none(), prev.is_none());

        if let Some(parent) = node.parent() {
            assert!(
                tree.children(parent).take(tree.len()).any(|c| c == id),
                "{id:?} not listed among children of {parent:?}"
            );
        } else {
            assert!(node.prev_sibling().is_none() && node.next_sibling().is_none());
        }
        assert!(
            tree.ancestors(id).take(tree.len()).count() < tree.len(),
            "parent cycle through {id:?}"
        );
    }
}

/// Panics unless every snapshot invariant holds.
pub fn check(snapshot: &Snapshot) {
    if let Err(err) = validate_tokens(snapshot.tokens(), snapshot.content().len()) {
        panic!("token invariant violated: {err}");
    }
    if let Err(err) = validate_token_ranges(snapshot.tree(), snapshot.tokens().len()) {
        panic!("node invariant violated: {err}");
    }
    check_tree(snapshot.tree());

    let records = snapshot.lines().records();
    assert_eq!(records.first().map(|r| r.start), Some(0));
    assert_eq!(
        records.last().map(|r| r.line_end),
        Some(snapshot.content().len())
    );
    for pair in records.windows(2) {
        assert_eq!(pair[0].line_end, pair[1].start, "line records not contiguous");
    }

    let tree = snapshot.tree();
    for id in tree.ids() {
        if let Some(span) = snapshot.span(id) {
            assert!(span.start < span.end, "{id:?} has an empty span");
            assert!(span.end <= snapshot.content().len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_xref_syntax::tokenize;

    #[test]
    fn mapped_documents_satisfy_invariants() {
        for doc in [
            "",
            "# A\n\ntext [x][y] and ![i](u)\n\n> quote\n> - item\n",
            "```\nunterminated",
            "<div id=\"a\">\n</div>\n\n[y]: /url\n",
            "| a | b |\n|---|---|\n| 1 | 2 |\n",
        ] {
            check(&Snapshot::from_bytes(doc));
        }
    }

    #[test]
    fn empty_tokens_only_for_empty_content() {
        assert!(validate_tokens(&[], 0).is_ok());
        assert!(matches!(
            validate_tokens(&[], 1),
            Err(SnapshotError::IncompleteCoverage { end: 0, len: 1 })
        ));
        assert!(validate_tokens(&tokenize(b"a\nb"), 3).is_ok());
    }
}
