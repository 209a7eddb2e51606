// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with [[Some Note|a link]] and *emphasis*.\n\n- [ ] Task item\n- [x] Done item\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_note(sections: usize) -> String {
    let mut content = String::from("---\ntitle: Bench\n---\n\n");

    for section in 0..sections {
        content.push_str(&format!("## Section {section}\n\n"));
        content.push_str(&format!(
            "Paragraph {section} with `code`, **strong** text and a [link](https://example.com/{section}).\n\n"
        ));
        content.push_str("> A quote with *emphasis*.\n\n");
        if section % 5 == 0 {
            content.push_str("| a | b |\n|---|---|\n| 1 | 2 |\n\n");
        }
    }

    content
}

/// Offset of the paragraph text in the middle of `text`.
#[allow(dead_code)]
pub fn middle_paragraph_offset(text: &str) -> usize {
    let mid = text.len() / 2;
    text[mid..]
        .find("Paragraph ")
        .map(|i| mid + i + "Paragraph ".len())
        .unwrap_or(0)
}
