//! Anchor collection: heading slugs and HTML `id`/`name` attributes.

use std::sync::LazyLock;

use log::{debug, trace};
use markdown_xref_config::AnchorOptions;
use markdown_xref_syntax::Span;
use regex::bytes::Regex;

use super::slug::Slugger;
use super::types::{Anchor, AnchorSource};
use crate::cancel::{CancellationToken, Outcome};
use crate::snapshot::Snapshot;
use crate::tree::{NodeId, NodeKind, Tree};

static HTML_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\b(id|name)\s*=\s*["']([^"']+)["']"#).unwrap());

pub(super) fn collect(
    snapshot: &Snapshot,
    options: &AnchorOptions,
    cancel: &CancellationToken,
) -> Outcome<Vec<Anchor>> {
    let tree = snapshot.tree();
    let mut slugger = Slugger::new();
    let mut anchors = Vec::new();

    for block in tree.children(tree.root()) {
        if cancel.is_cancelled() {
            debug!("anchor collection cancelled after {} anchors", anchors.len());
            return Outcome::Cancelled(anchors);
        }
        for id in tree.descendants(block) {
            let Some(kind) = tree.kind(id) else {
                continue;
            };
            if kind.is_heading() {
                let text = snapshot.node_text(id);
                let slug = slugger.slug(&text);
                if slug.is_empty() {
                    continue;
                }
                anchors.push(Anchor {
                    id: slug,
                    source: AnchorSource::Heading,
                    node: id,
                    position: snapshot.position(id),
                    original_text: text,
                });
            } else if options.html_anchors && carries_attributes(tree, id, kind) {
                html_anchors(snapshot, id, &mut anchors);
            }
        }
    }

    trace!("collected {} anchors", anchors.len());
    Outcome::Complete(anchors)
}

/// HTML blocks and inline HTML are scanned; `Html` lines inside an HTML
/// block are covered by the block itself.
fn carries_attributes(tree: &Tree, id: NodeId, kind: &NodeKind) -> bool {
    match kind {
        NodeKind::HtmlBlock | NodeKind::InlineHtml { .. } => true,
        NodeKind::Html { .. } => {
            let parent = tree.get(id).and_then(|n| n.parent());
            !matches!(parent.and_then(|p| tree.kind(p)), Some(NodeKind::HtmlBlock))
        }
        _ => false,
    }
}

fn html_anchors(snapshot: &Snapshot, id: NodeId, anchors: &mut Vec<Anchor>) {
    let Some(span) = snapshot.span(id) else {
        return;
    };
    let source = span.slice(snapshot.content());
    for caps in HTML_ANCHOR.captures_iter(source) {
        let (Some(whole), Some(attr), Some(value)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        let source = if attr.as_bytes().eq_ignore_ascii_case(b"id") {
            AnchorSource::HtmlId
        } else {
            AnchorSource::HtmlName
        };
        let matched = Span::new(span.start + whole.start(), span.start + whole.end());
        anchors.push(Anchor {
            id: String::from_utf8_lossy(value.as_bytes()).into_owned(),
            source,
            node: id,
            position: snapshot.lines().span_to_range(matched),
            original_text: String::from_utf8_lossy(whole.as_bytes()).into_owned(),
        });
    }
}
