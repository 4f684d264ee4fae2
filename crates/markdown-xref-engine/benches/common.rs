// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with a [link][ref] and [another](#section).\n\n- Bullet with ![image][img]\n  - Nested [shortcut]\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n";
    let mut content = base.repeat(size);
    content.push_str("[ref]: /docs/ref.md\n[img]: /img.png \"Image\"\n[shortcut]: https://example.com\n");
    content
}

#[allow(dead_code)]
pub fn generate_reference_heavy(sections: usize) -> String {
    let mut content = String::new();
    for section in 0..sections {
        content.push_str(&format!("## Section {section}\n\n"));
        content.push_str(&format!(
            "See [item {section}][d{section}], [back](#section-{}) and <a id=\"s{section}\"></a>.\n\n",
            section.saturating_sub(1)
        ));
    }
    for section in 0..sections {
        content.push_str(&format!("[d{section}]: /defs/{section}.md 'Definition {section}'\n"));
    }
    content
}
