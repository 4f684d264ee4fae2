use serde::Serialize;

/// How a link or image names its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceStyle {
    /// `[text](url)`
    Inline,
    /// `[text][label]`
    Full,
    /// `[text][]`
    Collapsed,
    /// `[text]`
    Shortcut,
    /// `<https://example.com>`
    Autolink,
}

impl ReferenceStyle {
    /// Styles that look their destination up through a definition.
    pub fn uses_definition(self) -> bool {
        matches!(self, Self::Full | Self::Collapsed | Self::Shortcut)
    }
}

/// Attributes shared by link and image nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkAttrs {
    /// `None` when the producer could not tell; the resolver then inspects
    /// the raw source line.
    pub style: Option<ReferenceStyle>,
    pub destination: String,
    pub title: String,
    /// Reference label as written, for reference-style links.
    pub label: Option<String>,
}

/// All node kinds in the syntax tree.
///
/// Leaf kinds that carry text keep their decoded literal; the exact source
/// is always available through the node's token range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum NodeKind {
    // Blocks
    Document,
    Paragraph,
    Heading { level: u8, setext: bool },
    BlockQuote,
    List { ordered: bool, start: Option<u64> },
    ListItem,
    CodeBlock { fenced: bool, info: String },
    HtmlBlock,
    ThematicBreak,
    Table,
    TableHead,
    TableRow,
    TableCell,
    FootnoteDefinition { label: String },

    // Inlines
    Text { literal: String },
    Code { literal: String },
    Html { literal: String },
    InlineHtml { literal: String },
    Emphasis,
    Strong,
    Strikethrough,
    Link(LinkAttrs),
    Image(LinkAttrs),
    SoftBreak,
    HardBreak,
    FootnoteReference { label: String },
    TaskListMarker { checked: bool },

    /// Anything the producer has no dedicated kind for.
    Other,
}

impl NodeKind {
    pub fn is_heading(&self) -> bool {
        matches!(self, Self::Heading { .. })
    }

    pub fn is_code_block(&self) -> bool {
        matches!(self, Self::CodeBlock { .. })
    }

    /// Raw HTML whose source may carry `id`/`name` attributes.
    pub fn is_raw_html(&self) -> bool {
        matches!(self, Self::HtmlBlock | Self::Html { .. } | Self::InlineHtml { .. })
    }

    /// Link or image attributes, if this is either.
    pub fn link_attrs(&self) -> Option<&LinkAttrs> {
        match self {
            Self::Link(attrs) | Self::Image(attrs) => Some(attrs),
            _ => None,
        }
    }

    /// Literal text this node contributes to its ancestors' plain text.
    pub fn literal(&self) -> Option<&str> {
        match self {
            Self::Text { literal } | Self::Code { literal } => Some(literal),
            Self::SoftBreak | Self::HardBreak => Some(" "),
            _ => None,
        }
    }
}
