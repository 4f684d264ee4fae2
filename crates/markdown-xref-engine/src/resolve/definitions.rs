//! Reference definition scan over raw lines.
//!
//! Lines lying inside code blocks are skipped; everything else is matched
//! against the definition grammar independently of the tree, so a
//! definition is found even where the parser folded it into something else.

use std::collections::HashSet;
use std::sync::LazyLock;

use log::{debug, trace};
use markdown_xref_syntax::Span;
use regex::bytes::{Captures, Regex};

use super::labels::normalize_label;
use super::types::ReferenceDefinition;
use crate::cancel::{CancellationToken, Outcome};
use crate::snapshot::Snapshot;

static DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s{0,3}\[([^\]]+)\]:\s*(\S+)(?:\s+"([^"]*)"|\s+'([^']*)'|\s+\(([^)]*)\))?\s*$"#,
    )
    .unwrap()
});

pub(super) fn collect(
    snapshot: &Snapshot,
    cancel: &CancellationToken,
) -> Outcome<Vec<ReferenceDefinition>> {
    let code = code_block_spans(snapshot);
    let content = snapshot.content();
    let mut seen = HashSet::new();
    let mut definitions = Vec::new();

    for (index, record) in snapshot.lines().records().iter().enumerate() {
        if cancel.is_cancelled() {
            debug!(
                "definition scan cancelled at line {} after {} definitions",
                index + 1,
                definitions.len()
            );
            return Outcome::Cancelled(definitions);
        }

        let line = record.content();
        if code.iter().any(|block| block.covers(line)) {
            continue;
        }
        let Some(caps) = DEFINITION.captures(line.slice(content)) else {
            continue;
        };

        let label_end = caps.get(1).map_or(0, |m| m.end() + "]:".len());
        let label = lossy(&caps, 1);
        let normalized_label = normalize_label(&label);
        if normalized_label.is_empty() {
            continue;
        }
        let is_duplicate = !seen.insert(normalized_label.clone());
        if is_duplicate {
            debug!(
                "duplicate definition [{}] on line {}",
                normalized_label,
                index + 1
            );
        }

        definitions.push(ReferenceDefinition {
            label,
            normalized_label,
            destination: strip_angle_brackets(lossy(&caps, 2)),
            title: [3, 4, 5]
                .into_iter()
                .find(|&group| caps.get(group).is_some())
                .map(|group| lossy(&caps, group)),
            span: line,
            label_span: Span::new(line.start, line.start + label_end),
            position: snapshot.lines().span_to_range(line),
            is_duplicate,
            usage_count: 0,
        });
    }

    trace!("collected {} definitions", definitions.len());
    Outcome::Complete(definitions)
}

fn code_block_spans(snapshot: &Snapshot) -> Vec<Span> {
    let tree = snapshot.tree();
    tree.descendants(tree.root())
        .filter(|&id| tree.kind(id).is_some_and(|k| k.is_code_block()))
        .filter_map(|id| snapshot.span(id))
        .collect()
}

fn lossy(caps: &Captures<'_>, group: usize) -> String {
    caps.get(group)
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
        .unwrap_or_default()
}

fn strip_angle_brackets(destination: String) -> String {
    match destination
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
    {
        Some(inner) => inner.to_string(),
        None => destination,
    }
}
