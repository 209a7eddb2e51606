//! Block tokenizers.
//!
//! A tokenizer turns source text into a flat token stream where each
//! block-level token carries a `[start_line, end_line)` line map. Only
//! top-level opening tokens are used to cut blocks, so implementations just
//! need to get nesting levels and line maps right.

use pulldown_cmark::{Event, Options, Parser, Tag};
use tree_sitter::Node;
use tree_sitter_md::LANGUAGE;

use crate::parsing::text::LineIndex;

/// One token of a block tokenizer's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockToken {
    /// Construct name, e.g. `paragraph` or `heading`.
    pub kind: &'static str,
    /// Block-level (as opposed to inline) token.
    pub block: bool,
    /// `1` opens, `-1` closes, `0` is self-contained.
    pub nesting: i8,
    /// Container depth, `0` for top-level blocks.
    pub level: u32,
    /// 0-based `[start_line, end_line)`; `None` on closing tokens.
    pub map: Option<(usize, usize)>,
}

impl BlockToken {
    /// True for tokens that open a top-level block with a usable line map.
    pub fn opens_top_level(&self) -> bool {
        self.block && self.nesting != -1 && self.level == 0 && self.map.is_some()
    }
}

pub trait BlockTokenizer {
    fn tokenize(&self, source: &str) -> Vec<BlockToken>;
}

/// Tokenizer backed by pulldown-cmark's offset iterator.
#[derive(Debug, Clone, Copy, Default)]
pub struct PulldownTokenizer;

impl PulldownTokenizer {
    fn options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_FOOTNOTES
    }

    fn block_kind(tag: &Tag) -> Option<&'static str> {
        Some(match tag {
            Tag::Paragraph { .. } => "paragraph",
            Tag::Heading { .. } => "heading",
            Tag::BlockQuote { .. } => "blockquote",
            Tag::CodeBlock { .. } => "code_block",
            Tag::HtmlBlock { .. } => "html_block",
            Tag::List { .. } => "list",
            Tag::Item { .. } => "list_item",
            Tag::FootnoteDefinition { .. } => "footnote",
            Tag::Table { .. } => "table",
            Tag::TableHead { .. } => "table_head",
            Tag::TableRow { .. } => "table_row",
            Tag::TableCell { .. } => "table_cell",
            _ => return None,
        })
    }

    fn line_map(lines: &LineIndex, range: std::ops::Range<usize>) -> Option<(usize, usize)> {
        if range.end <= range.start {
            return None;
        }
        let start = lines.line_of_offset(range.start) - 1;
        let end = lines.line_of_offset(range.end - 1);
        Some((start, end))
    }
}

impl BlockTokenizer for PulldownTokenizer {
    fn tokenize(&self, source: &str) -> Vec<BlockToken> {
        let lines = LineIndex::new(source);
        let mut tokens = Vec::new();
        // One entry per open tag: the block kind, if it was a block.
        let mut open: Vec<Option<&'static str>> = Vec::new();

        for (event, range) in Parser::new_ext(source, Self::options()).into_offset_iter() {
            let level = open.len() as u32;
            match event {
                Event::Start(tag) => {
                    let kind = Self::block_kind(&tag);
                    if let Some(kind) = kind {
                        tokens.push(BlockToken {
                            kind,
                            block: true,
                            nesting: 1,
                            level,
                            map: Self::line_map(&lines, range),
                        });
                    }
                    open.push(kind);
                }
                Event::End(_) => {
                    if let Some(kind) = open.pop().flatten() {
                        tokens.push(BlockToken {
                            kind,
                            block: true,
                            nesting: -1,
                            level: open.len() as u32,
                            map: None,
                        });
                    }
                }
                Event::Rule => tokens.push(BlockToken {
                    kind: "hr",
                    block: true,
                    nesting: 0,
                    level,
                    map: Self::line_map(&lines, range),
                }),
                _ => {}
            }
        }
        tokens
    }
}

/// Tokenizer backed by the tree-sitter-md block grammar.
///
/// `section` nodes are structural wrappers around a heading and its content
/// and are flattened away so every heading, paragraph, list etc. is top-level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSitterTokenizer;

impl TreeSitterTokenizer {
    const SECTION: &'static str = "section";

    fn kind_name(kind: &str) -> &'static str {
        match kind {
            "atx_heading" | "setext_heading" => "heading",
            "paragraph" => "paragraph",
            "fenced_code_block" | "indented_code_block" => "code_block",
            "block_quote" => "blockquote",
            "list" => "list",
            "thematic_break" => "hr",
            "pipe_table" => "table",
            "html_block" => "html_block",
            "minus_metadata" | "plus_metadata" => "frontmatter",
            "link_reference_definition" => "reference",
            _ => "block",
        }
    }

    fn collect(node: Node, out: &mut Vec<BlockToken>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == Self::SECTION {
                Self::collect(child, out);
                continue;
            }
            let start = child.start_position();
            let end = child.end_position();
            let end_line = if end.column == 0 { end.row } else { end.row + 1 };
            out.push(BlockToken {
                kind: Self::kind_name(child.kind()),
                block: true,
                nesting: 0,
                level: 0,
                map: (end_line > start.row).then_some((start.row, end_line)),
            });
        }
    }
}

impl BlockTokenizer for TreeSitterTokenizer {
    fn tokenize(&self, source: &str) -> Vec<BlockToken> {
        let mut parser = tree_sitter::Parser::new();
        if let Err(e) = parser.set_language(&LANGUAGE.into()) {
            log::warn!("tree-sitter markdown grammar unavailable: {e}");
            return Vec::new();
        }
        let Some(tree) = parser.parse(source, None) else {
            return Vec::new();
        };
        let mut tokens = Vec::new();
        Self::collect(tree.root_node(), &mut tokens);
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn top_level_maps(tokenizer: &dyn BlockTokenizer, source: &str) -> Vec<(usize, usize)> {
        tokenizer
            .tokenize(source)
            .iter()
            .filter(|t| t.opens_top_level())
            .filter_map(|t| t.map)
            .collect()
    }

    #[test]
    fn pulldown_maps_top_level_blocks_to_lines() {
        let source = "# Title\n\nParagraph one.\n\nParagraph two.\n";
        assert_eq!(
            top_level_maps(&PulldownTokenizer, source),
            vec![(0, 1), (2, 3), (4, 5)]
        );
    }

    #[test]
    fn pulldown_nested_blocks_are_not_top_level() {
        let tokens = PulldownTokenizer.tokenize("> quoted\n> text\n");
        let quote = tokens.iter().find(|t| t.kind == "blockquote").unwrap();
        assert_eq!(quote.level, 0);
        assert_eq!(quote.map, Some((0, 2)));
        let para = tokens.iter().find(|t| t.kind == "paragraph").unwrap();
        assert_eq!(para.level, 1);
    }

    #[test]
    fn pulldown_emits_closing_tokens() {
        let tokens = PulldownTokenizer.tokenize("para\n");
        let closes: Vec<_> = tokens.iter().filter(|t| t.nesting == -1).collect();
        assert_eq!(closes.len(), 1);
        assert_eq!(closes[0].map, None);
    }

    #[test]
    fn pulldown_rule_is_self_contained() {
        let tokens = PulldownTokenizer.tokenize("a\n\n---\n\nb\n");
        let hr = tokens.iter().find(|t| t.kind == "hr").unwrap();
        assert_eq!(hr.nesting, 0);
        assert_eq!(hr.map, Some((2, 3)));
    }

    #[test]
    fn tree_sitter_flattens_sections() {
        let source = "# Title\n\nParagraph one.\n\n## Sub\n\nParagraph two.\n";
        let kinds: Vec<_> = TreeSitterTokenizer
            .tokenize(source)
            .iter()
            .map(|t| t.kind)
            .filter(|&k| k != "block")
            .collect();
        assert_eq!(
            kinds,
            vec!["heading", "paragraph", "heading", "paragraph"]
        );
    }
}
