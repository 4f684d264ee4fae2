use std::sync::Arc;

use markdown_xref_engine::{
    AnchorSource, Context, MarkdownOptions, Position, ReferenceStyle, Slugger, Snapshot,
    normalize_label, resolve,
};
use pretty_assertions::assert_eq;

fn context(content: &str) -> Context {
    resolve(&Arc::new(Snapshot::from_bytes(content)))
}

#[test]
fn label_normalization() {
    assert_eq!(normalize_label("FoO  BaR"), "foo bar");
    assert_eq!(normalize_label("foo\tbar"), "foo bar");
}

#[test]
fn slug_suffixes() {
    let mut slugger = Slugger::new();
    let slugs: Vec<_> = (0..3).map(|_| slugger.slug("Hello World")).collect();
    assert_eq!(slugs, vec!["hello-world", "hello-world-1", "hello-world-2"]);
}

#[test]
fn duplicate_definitions_scenario() {
    let ctx = context("[a]: /url\n[a]: /other\n[text][a]\n");

    let definitions = ctx.definitions();
    assert_eq!(definitions.len(), 2);
    assert_eq!(
        (definitions[0].destination.as_str(), definitions[0].is_duplicate),
        ("/url", false)
    );
    assert_eq!(
        (definitions[1].destination.as_str(), definitions[1].is_duplicate),
        ("/other", true)
    );
    assert_eq!(definitions[0].usage_count, 1);

    let usage = &ctx.usages()[0];
    assert_eq!(usage.style, ReferenceStyle::Full);
    assert_eq!(usage.resolved_definition, Some(0));
    assert_eq!(usage.position.start, Position::new(3, 1));
}

#[test]
fn heading_anchor_with_symbols() {
    let ctx = context("# C++ Guide\n");
    let anchor = ctx.anchor("c-guide").unwrap();
    assert_eq!(anchor.source, AnchorSource::Heading);
    assert_eq!(anchor.original_text, "C++ Guide");
}

#[test]
fn fragment_validity() {
    let ctx = context("no anchors here\n");
    assert!(ctx.is_valid_fragment("#top"));
    assert!(ctx.is_valid_fragment("#L20"));
    assert!(ctx.is_valid_fragment(""));
    assert!(!ctx.is_valid_fragment("#nonexistent"));
}

#[test]
fn definitions_positions_and_titles() {
    let ctx = context("Intro.\n\n[docs]: https://example.com/docs 'Docs'\n");
    let docs = ctx.definition("Docs").unwrap();
    assert_eq!(docs.title.as_deref(), Some("Docs"));
    assert_eq!(docs.position.start, Position::new(3, 1));
    assert!(ctx.unused_definitions().any(|d| d.label == "docs"));
}

#[test]
fn images_resolve_like_links() {
    let ctx = context("![logo][brand]\n\n[brand]: /logo.png\n");
    let usage = &ctx.usages()[0];
    assert!(usage.is_image);
    assert_eq!(usage.text, "logo");
    assert_eq!(
        ctx.resolved_definition(usage).map(|d| d.destination.as_str()),
        Some("/logo.png")
    );
}

#[test]
fn mixed_document() {
    let content = "\
# Project

Read the [guide][Guide] and the [FAQ].
Jump to [setup](#setup) or [nowhere](#missing).

## Setup

<a id=\"install\"></a>

```text
[guide]: /not-a-definition
```

[guide]: /docs/guide.md
[faq]: /docs/faq.md#top
";
    let ctx = context(content);

    let anchors: Vec<_> = ctx.anchors().iter().map(|a| (a.id.as_str(), a.source)).collect();
    assert_eq!(
        anchors,
        vec![
            ("project", AnchorSource::Heading),
            ("setup", AnchorSource::Heading),
            ("install", AnchorSource::HtmlId),
        ]
    );

    let destinations: Vec<_> = ctx.definitions().iter().map(|d| d.destination.as_str()).collect();
    assert_eq!(destinations, vec!["/docs/guide.md", "/docs/faq.md#top"]);
    assert!(ctx.definitions().iter().all(|d| d.usage_count == 1));

    assert_eq!(ctx.unresolved_usages().count(), 0);
    let broken: Vec<_> = ctx.invalid_fragments().map(|u| u.destination.as_str()).collect();
    assert_eq!(broken, vec!["#missing"]);
}

#[test]
fn document_loaded_from_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("README.md");
    std::fs::write(&path, "# Title\n\n[t](#title)\n").unwrap();

    let snapshot = Arc::new(Snapshot::from_path_with(&path, &MarkdownOptions::default()).unwrap());
    let ctx = resolve(&snapshot);
    assert_eq!(ctx.invalid_fragments().count(), 0);
    assert_eq!(ctx.snapshot().id(), snapshot.id());
}
