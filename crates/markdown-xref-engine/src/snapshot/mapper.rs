//! Builds the tree shape from pulldown-cmark's offset iterator.
//!
//! pulldown-cmark needs `&str`, so content that is not valid UTF-8 is viewed
//! with every invalid byte replaced by `?`. That keeps byte offsets identical
//! to the original buffer, and event ranges map straight onto tokens.

use std::borrow::Cow;
use std::ops::Range;

use markdown_xref_config::MarkdownOptions;
use markdown_xref_syntax::Token;
use pulldown_cmark::{BrokenLink, CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag};

use crate::tree::{LinkAttrs, NodeKind, ReferenceStyle, TokenRange, Tree};

pub(super) fn map(content: &[u8], tokens: &[Token], options: &MarkdownOptions) -> Tree {
    let root_range = tokens
        .len()
        .checked_sub(1)
        .map(|last| TokenRange::new(0, last));
    let mut tree = Tree::new(NodeKind::Document, root_range);
    if tokens.is_empty() {
        return tree;
    }

    let text = utf8_view(content);
    let capture = options.capture_undefined_references;
    let parser = Parser::new_with_broken_link_callback(
        &text,
        parser_options(options),
        Some(move |_link: BrokenLink<'_>| {
            capture.then_some((CowStr::Borrowed(""), CowStr::Borrowed("")))
        }),
    )
    .into_offset_iter();

    let root = tree.root();
    let mut stack = vec![root];
    for (event, range) in parser {
        let parent = stack.last().copied().unwrap_or(root);
        let token_range = token_range(tokens, range.clone());
        match event {
            Event::Start(tag) => {
                let kind = start_kind(tag, content, range.start);
                let id = tree.push_child(parent, kind, token_range);
                stack.push(id);
            }
            Event::End(_) => {
                if stack.len() > 1 {
                    stack.pop();
                }
            }
            leaf => {
                tree.push_child(parent, leaf_kind(leaf), token_range);
            }
        }
    }
    tree
}

fn parser_options(options: &MarkdownOptions) -> Options {
    let mut parser_options = Options::empty();
    parser_options.set(Options::ENABLE_TABLES, options.tables);
    parser_options.set(Options::ENABLE_STRIKETHROUGH, options.strikethrough);
    parser_options.set(Options::ENABLE_TASKLISTS, options.tasklists);
    parser_options.set(Options::ENABLE_FOOTNOTES, options.footnotes);
    parser_options
}

/// Same-length `str` view of `content`.
fn utf8_view(content: &[u8]) -> Cow<'_, str> {
    if let Ok(text) = std::str::from_utf8(content) {
        return Cow::Borrowed(text);
    }
    let mut text = String::with_capacity(content.len());
    for chunk in content.utf8_chunks() {
        text.push_str(chunk.valid());
        text.extend(std::iter::repeat_n('?', chunk.invalid().len()));
    }
    Cow::Owned(text)
}

/// Tokens overlapping `range`; `None` for an empty range.
fn token_range(tokens: &[Token], range: Range<usize>) -> Option<TokenRange> {
    if range.start >= range.end {
        return None;
    }
    let first = tokens.partition_point(|t| t.end <= range.start);
    let last = tokens
        .partition_point(|t| t.start < range.end)
        .checked_sub(1)?;
    (first <= last).then(|| TokenRange::new(first, last))
}

fn start_kind(tag: Tag<'_>, content: &[u8], start: usize) -> NodeKind {
    match tag {
        Tag::Paragraph => NodeKind::Paragraph,
        Tag::Heading { level, .. } => NodeKind::Heading {
            level: level as u8,
            setext: !starts_with_hash(content, start),
        },
        Tag::BlockQuote(_) => NodeKind::BlockQuote,
        Tag::CodeBlock(CodeBlockKind::Fenced(info)) => NodeKind::CodeBlock {
            fenced: true,
            info: info.into_string(),
        },
        Tag::CodeBlock(CodeBlockKind::Indented) => NodeKind::CodeBlock {
            fenced: false,
            info: String::new(),
        },
        Tag::HtmlBlock => NodeKind::HtmlBlock,
        Tag::List(start) => NodeKind::List {
            ordered: start.is_some(),
            start,
        },
        Tag::Item => NodeKind::ListItem,
        Tag::FootnoteDefinition(label) => NodeKind::FootnoteDefinition {
            label: label.into_string(),
        },
        Tag::Table(_) => NodeKind::Table,
        Tag::TableHead => NodeKind::TableHead,
        Tag::TableRow => NodeKind::TableRow,
        Tag::TableCell => NodeKind::TableCell,
        Tag::Emphasis => NodeKind::Emphasis,
        Tag::Strong => NodeKind::Strong,
        Tag::Strikethrough => NodeKind::Strikethrough,
        Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        } => NodeKind::Link(link_attrs(link_type, dest_url, title, id)),
        Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        } => NodeKind::Image(link_attrs(link_type, dest_url, title, id)),
        _ => NodeKind::Other,
    }
}

fn leaf_kind(event: Event<'_>) -> NodeKind {
    match event {
        Event::Text(text) => NodeKind::Text {
            literal: text.into_string(),
        },
        Event::Code(code) => NodeKind::Code {
            literal: code.into_string(),
        },
        Event::Html(html) => NodeKind::Html {
            literal: html.into_string(),
        },
        Event::InlineHtml(html) => NodeKind::InlineHtml {
            literal: html.into_string(),
        },
        Event::SoftBreak => NodeKind::SoftBreak,
        Event::HardBreak => NodeKind::HardBreak,
        Event::Rule => NodeKind::ThematicBreak,
        Event::FootnoteReference(label) => NodeKind::FootnoteReference {
            label: label.into_string(),
        },
        Event::TaskListMarker(checked) => NodeKind::TaskListMarker { checked },
        _ => NodeKind::Other,
    }
}

fn link_attrs(link_type: LinkType, dest: CowStr<'_>, title: CowStr<'_>, id: CowStr<'_>) -> LinkAttrs {
    let style = match link_type {
        LinkType::Inline => Some(ReferenceStyle::Inline),
        LinkType::Reference | LinkType::ReferenceUnknown => Some(ReferenceStyle::Full),
        LinkType::Collapsed | LinkType::CollapsedUnknown => Some(ReferenceStyle::Collapsed),
        LinkType::Shortcut | LinkType::ShortcutUnknown => Some(ReferenceStyle::Shortcut),
        LinkType::Autolink | LinkType::Email => Some(ReferenceStyle::Autolink),
        _ => None,
    };
    LinkAttrs {
        style,
        destination: dest.into_string(),
        title: title.into_string(),
        label: (!id.is_empty()).then(|| id.into_string()),
    }
}

/// ATX headings start with `#` after optional indentation; setext ones don't.
fn starts_with_hash(content: &[u8], start: usize) -> bool {
    content
        .get(start..)
        .and_then(|rest| rest.iter().find(|&&b| b != b' ' && b != b'\t'))
        == Some(&b'#')
}
