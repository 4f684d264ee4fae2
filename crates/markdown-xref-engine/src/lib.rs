//! Token-indexed syntax tree, position mapping and reference/anchor
//! resolution for Markdown documents.
//!
//! ```
//! use std::sync::Arc;
//! use markdown_xref_engine::{Snapshot, resolve};
//!
//! let snapshot = Arc::new(Snapshot::from_bytes("# Intro\n\nSee [docs][d].\n\n[d]: /docs\n"));
//! let context = resolve(&snapshot);
//!
//! assert_eq!(context.definition("D").map(|d| d.usage_count), Some(1));
//! assert!(context.is_valid_fragment("#intro"));
//! ```

pub mod cancel;
pub mod resolve;
pub mod snapshot;
pub mod tree;

// Re-export key types for easier usage
pub use cancel::{CancellationToken, Outcome};
pub use markdown_xref_config::{AnchorOptions, MarkdownOptions};
pub use markdown_xref_syntax::{Position, SourceRange, Span, Token, TokenKind, TokenMeta};
pub use resolve::{
    Anchor, AnchorSource, Context, ReferenceDefinition, ReferenceUsage, Slugger, normalize_label,
    resolve, resolve_with, resolve_with_cancel, slugify,
};
pub use snapshot::{Snapshot, SnapshotError, SnapshotId, invariants};
pub use tree::{LinkAttrs, NodeId, NodeKind, ReferenceStyle, TokenRange, Tree, TreeError};
