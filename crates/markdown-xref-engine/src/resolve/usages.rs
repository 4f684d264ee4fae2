//! Link and image usage collection.
//!
//! Reference style and label come from the node attributes when the tree
//! producer set them. Otherwise the single source line holding the start of
//! the node is inspected; labels spanning lines are not recognised there.
//!
//! A definition line that the parser read as paragraph text yields a link
//! node for its own `[label]`. Nodes starting inside a claimed definition
//! prefix are therefore skipped.

use log::{debug, trace};
use markdown_xref_syntax::Span;

use super::labels::normalize_label;
use super::types::ReferenceUsage;
use crate::cancel::{CancellationToken, Outcome};
use crate::snapshot::Snapshot;
use crate::tree::{LinkAttrs, NodeId, NodeKind, ReferenceStyle};

pub(super) fn collect(
    snapshot: &Snapshot,
    claimed: &[Span],
    cancel: &CancellationToken,
) -> Outcome<Vec<ReferenceUsage>> {
    let tree = snapshot.tree();
    let mut usages = Vec::new();

    for block in tree.children(tree.root()) {
        if cancel.is_cancelled() {
            debug!("usage collection cancelled after {} usages", usages.len());
            return Outcome::Cancelled(usages);
        }
        for id in tree.descendants(block) {
            if is_claimed(snapshot, id, claimed) {
                continue;
            }
            match tree.kind(id) {
                Some(NodeKind::Link(attrs)) => usages.push(usage(snapshot, id, attrs, false)),
                Some(NodeKind::Image(attrs)) => usages.push(usage(snapshot, id, attrs, true)),
                _ => {}
            }
        }
    }

    trace!("collected {} usages", usages.len());
    Outcome::Complete(usages)
}

fn is_claimed(snapshot: &Snapshot, id: NodeId, claimed: &[Span]) -> bool {
    !claimed.is_empty()
        && snapshot
            .span(id)
            .is_some_and(|span| claimed.iter().any(|prefix| prefix.contains(span.start)))
}

fn usage(snapshot: &Snapshot, id: NodeId, attrs: &LinkAttrs, is_image: bool) -> ReferenceUsage {
    let text = snapshot.node_text(id);
    let (style, label) = match attrs.style {
        Some(style) if style.uses_definition() => {
            let label = match (&attrs.label, style) {
                (Some(label), _) => Some(label.clone()),
                (None, ReferenceStyle::Full) => source_style(snapshot, id, &text).1,
                (None, _) => Some(text.clone()),
            };
            (style, label)
        }
        Some(style) => (style, None),
        None => source_style(snapshot, id, &text),
    };
    let fragment = attrs
        .destination
        .find('#')
        .map(|at| attrs.destination[at..].to_string())
        .unwrap_or_default();

    ReferenceUsage {
        node: id,
        style,
        is_image,
        normalized_label: label.as_deref().map(normalize_label),
        label,
        text,
        destination: attrs.destination.clone(),
        fragment,
        position: snapshot.position(id),
        resolved_definition: None,
    }
}

/// Style and label read from the rest of the line starting at the node.
fn source_style(snapshot: &Snapshot, id: NodeId, text: &str) -> (ReferenceStyle, Option<String>) {
    let Some(span) = snapshot.span(id) else {
        return (ReferenceStyle::Inline, None);
    };
    let lines = snapshot.lines();
    let record = lines.records()[lines.line_index_of(span.start)];
    let end = record.content_end.max(span.start);
    let rest = &snapshot.content()[span.start..end];
    classify(rest, text)
}

/// Classify link source text: `[text][label]`, `[text][]`, `[text]` or inline.
pub(crate) fn classify(source: &[u8], text: &str) -> (ReferenceStyle, Option<String>) {
    let open = usize::from(source.first() == Some(&b'!'));
    if source.get(open) != Some(&b'[') {
        return (ReferenceStyle::Inline, None);
    }
    let Some(close) = closing_bracket(source, open) else {
        return (ReferenceStyle::Inline, None);
    };

    match source.get(close + 1) {
        Some(b'(') => (ReferenceStyle::Inline, None),
        Some(b'[') => {
            let label_start = close + 2;
            match source[label_start..].iter().position(|&b| b == b']') {
                Some(0) => (ReferenceStyle::Collapsed, Some(text.to_string())),
                Some(len) => {
                    let label = &source[label_start..label_start + len];
                    (
                        ReferenceStyle::Full,
                        Some(String::from_utf8_lossy(label).into_owned()),
                    )
                }
                None => (ReferenceStyle::Inline, None),
            }
        }
        _ => (ReferenceStyle::Shortcut, Some(text.to_string())),
    }
}

/// Index of the `]` matching the `[` at `open`, skipping escaped brackets.
fn closing_bracket(source: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < source.len() {
        match source[i] {
            b'\\' => i += 1,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}
