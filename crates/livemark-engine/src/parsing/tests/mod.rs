//! Fixture tests for the parsing module.
//!
//! Each fixture is parsed in full, checked against the output invariants and
//! compared with an inline snapshot of its blocks and inline spans.

mod invariants;
mod normalize;

pub(crate) use invariants::check_model;

use crate::parsing::{IncrementalMarkdownParser, MarkdownParser, ParseReason, ParserOptions};

fn parse(text: &str) -> String {
    let result = IncrementalMarkdownParser::default().parse_full(text, ParseReason::FullParse);
    invariants::check(text, &result);
    normalize::normalize(text, &result)
}

// Fixture-based snapshot tests

#[test]
fn fixture_simple_document() {
    let md = "# Title\n\nSome *emphasis* and `code`.\n\n- [ ] task one\n- [x] task two\n";
    insta::assert_snapshot!(parse(md), @r"
    heading 0..8 # Title\n
    paragraph 9..37 Some *emphasis* and `code`.\n
      emphasis 15..23 emphasis
      inline-code 30..34 code
    task 38..68 - [ ] task one\n- [x] task two\n
    ");
}

#[test]
fn fixture_frontmatter_and_links() {
    let md = "---\ntitle: demo\n---\n\nSee [[Note|alias]] and [site](http://x.y).\n\n![[pic.png]]\n";
    insta::assert_snapshot!(parse(md), @r"
    frontmatter 0..20 ---\ntitle: demo\n---\n
    paragraph 21..64 See [[Note|alias]] and [site](http://x.y).\n
      wikilink 25..39 [[Note|alias]]
      wikilink-target 27..31 Note
      wikilink-alias 32..37 alias
      link-label 45..49 site
      link-url 51..61 http://x.y
    embed 65..78 ![[pic.png]]\n
      embed 65..77 ![[pic.png]]
      embed-target 68..75 pic.png
    ");
}

#[test]
fn fixture_blank_line_fallback() {
    let md = "para one\nline two\n\n\n## Not split\ntext\n";
    let result = IncrementalMarkdownParser::without_tokenizer(ParserOptions::default())
        .parse_full(md, ParseReason::FullParse);
    invariants::check(md, &result);
    insta::assert_snapshot!(normalize::normalize(md, &result), @r"
    paragraph 0..17 para one\nline two
    heading 20..37 ## Not split\ntext
    ");
}

// Invariant tests

/// Slicing any block span reproduces non-empty source text.
#[test]
fn block_spans_slice_back_to_source() {
    let md = "Hello [[world]]!\n\n> quote\n\n```\nfence\n```\n";
    let result = IncrementalMarkdownParser::default().parse_full(md, ParseReason::FullParse);
    invariants::check(md, &result);
    for b in &result.blocks {
        assert!(!md[b.start..b.end].trim().is_empty());
    }
}

#[test]
fn unclosed_constructs_produce_no_spans() {
    let md = "[[unclosed and `also unclosed";
    let result = IncrementalMarkdownParser::default().parse_full(md, ParseReason::FullParse);
    assert_eq!(result.blocks.len(), 1);
    assert!(result.inline_spans.is_empty());
}

#[test]
fn empty_document() {
    let result = IncrementalMarkdownParser::default().parse_full("", ParseReason::FullParse);
    assert!(result.blocks.is_empty());
    assert!(result.inline_spans.is_empty());
}

#[test]
fn blank_lines_only() {
    let result = IncrementalMarkdownParser::default().parse_full("\n\n\n", ParseReason::FullParse);
    assert!(result.blocks.is_empty());
}
