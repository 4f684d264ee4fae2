//! # Reference/Anchor Resolution
//!
//! Three independent passes over a finished [`Snapshot`], then one
//! resolution step:
//!
//! ```text
//! Snapshot ──┬─> anchors      headings (slugged) + HTML id/name attributes
//!            ├─> usages       links and images, with reference style
//!            └─> definitions  `[label]: dest "title"` lines outside code
//!                    │
//!                    v
//!            Context  usages resolved against the first definition
//!                     of each normalized label
//! ```
//!
//! Passes are pure functions of the tree and bytes, so resolving the same
//! snapshot twice gives identical results. Duplicates, unresolved labels and
//! broken fragments are findings exposed by [`Context`], never errors.

mod anchors;
mod context;
mod definitions;
pub mod fragment;
mod labels;
pub mod slug;
mod types;
mod usages;

use std::sync::Arc;

use log::debug;
use markdown_xref_config::AnchorOptions;

pub use context::Context;
pub use labels::normalize_label;
pub use slug::{Slugger, slugify};
pub use types::{Anchor, AnchorSource, ReferenceDefinition, ReferenceUsage};

use crate::cancel::{CancellationToken, Outcome};
use crate::snapshot::Snapshot;

pub fn resolve(snapshot: &Arc<Snapshot>) -> Context {
    resolve_with(snapshot, &AnchorOptions::default())
}

pub fn resolve_with(snapshot: &Arc<Snapshot>, options: &AnchorOptions) -> Context {
    resolve_with_cancel(snapshot, options, &CancellationToken::new()).into_inner()
}

/// Like [`resolve_with`], checking `cancel` once per top-level block and
/// once per line of the definition scan.
///
/// A cancelled run still returns a context built from whatever the passes
/// collected before stopping.
pub fn resolve_with_cancel(
    snapshot: &Arc<Snapshot>,
    options: &AnchorOptions,
    cancel: &CancellationToken,
) -> Outcome<Context> {
    let anchors = anchors::collect(snapshot, options, cancel);
    let definitions = definitions::collect(snapshot, cancel);
    let claimed: Vec<_> = match &definitions {
        Outcome::Complete(found) | Outcome::Cancelled(found) => {
            found.iter().map(|d| d.label_span).collect()
        }
    };
    let usages = usages::collect(snapshot, &claimed, cancel);

    let cancelled = anchors.is_cancelled() || usages.is_cancelled() || definitions.is_cancelled();
    let context = Context::build(
        Arc::clone(snapshot),
        definitions.into_inner(),
        usages.into_inner(),
        anchors.into_inner(),
    );

    if cancelled {
        debug!("resolution of snapshot {:?} cancelled", snapshot.id());
        Outcome::Cancelled(context)
    } else {
        Outcome::Complete(context)
    }
}
