use markdown_xref_syntax::{SourceRange, Span};
use serde::Serialize;

use crate::tree::{NodeId, ReferenceStyle};

/// A `[label]: destination "title"` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceDefinition {
    pub label: String,
    pub normalized_label: String,
    pub destination: String,
    pub title: Option<String>,
    /// The definition line without its terminator.
    pub span: Span,
    /// From the start of the line through the `]:` after the label.
    pub label_span: Span,
    pub position: SourceRange,
    /// A definition with the same normalized label appeared earlier.
    /// Duplicates never resolve usages.
    pub is_duplicate: bool,
    pub usage_count: usize,
}

/// A link or image in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceUsage {
    pub node: NodeId,
    pub style: ReferenceStyle,
    pub is_image: bool,
    pub text: String,
    /// Reference label; `None` for inline links and autolinks.
    pub label: Option<String>,
    pub normalized_label: Option<String>,
    pub destination: String,
    /// Everything from the first `#` of the destination, or empty.
    pub fragment: String,
    pub position: SourceRange,
    /// Index into [`Context::definitions`](super::Context::definitions).
    pub resolved_definition: Option<usize>,
}

impl ReferenceUsage {
    /// True if the destination points inside the current document.
    pub fn is_in_document(&self) -> bool {
        self.destination.starts_with('#')
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorSource {
    Heading,
    HtmlId,
    HtmlName,
}

/// A fragment target. Several anchors may share an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anchor {
    pub id: String,
    pub source: AnchorSource,
    pub node: NodeId,
    pub position: SourceRange,
    /// Heading text, or the attribute as written for HTML anchors.
    pub original_text: String,
}
