//! Block type classification and frontmatter detection.
//!
//! Classification looks only at a block's own source. Rules are tried in a
//! fixed order and the first match wins, so e.g. `- [ ] x` is a task and
//! never a plain list.

use crate::parsing::text::Span;

use super::kinds::{
    BlockQuote, CodeFence, EmbedLine, Frontmatter, Heading, ListItem, Table, ThematicBreak,
};
use super::types::{BlockAttrs, BlockType};

/// Classifies one block's source text.
///
/// Frontmatter is only considered for the first block of the document.
pub fn classify_block_source(text: &str, is_first_block: bool) -> BlockType {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return BlockType::Paragraph;
    }
    if looks_like_frontmatter_block(text, is_first_block) {
        return BlockType::Frontmatter;
    }
    if EmbedLine::is_embed(trimmed) {
        return BlockType::Embed;
    }
    if EmbedLine::is_wikilink(trimmed) {
        return BlockType::Wikilink;
    }
    if ThematicBreak::matches(trimmed) {
        return BlockType::Hr;
    }
    if Heading::level(trimmed).is_some() {
        return BlockType::Heading;
    }
    if BlockQuote::opens(trimmed) {
        return BlockType::Blockquote;
    }
    if CodeFence::encloses(trimmed) {
        return BlockType::Code;
    }
    if ListItem::task_state(trimmed).is_some() {
        return BlockType::Task;
    }
    if ListItem::marker(trimmed).is_some() {
        return BlockType::List;
    }
    if Table::looks_like(text) {
        return BlockType::Table;
    }
    BlockType::Paragraph
}

/// Leading frontmatter of `text`, if any.
pub fn extract_leading_frontmatter(text: &str) -> Option<Frontmatter> {
    Frontmatter::extract(text)
}

/// Absolute range of the leading frontmatter of `text`, which starts at `offset`.
pub fn extract_frontmatter_range(text: &str, offset: usize) -> Option<Span> {
    let fm = Frontmatter::extract(text)?;
    Span::clamped(offset, offset + fm.total_length, usize::MAX)
}

pub fn looks_like_frontmatter_block(text: &str, is_first_block: bool) -> bool {
    is_first_block && Frontmatter::extract(text).is_some()
}

/// Attributes for a block of type `kind`, read from the first line of `text`.
pub fn build_block_attrs(kind: BlockType, text: &str) -> BlockAttrs {
    let first_line = text.split('\n').next().unwrap_or_default();
    match kind {
        BlockType::Heading => BlockAttrs {
            level: Heading::level(first_line),
            ..BlockAttrs::default()
        },
        BlockType::Task => BlockAttrs {
            checked: Some(ListItem::has_checked_box(first_line)),
            ..BlockAttrs::default()
        },
        BlockType::Frontmatter => BlockAttrs {
            fenced: true,
            ..BlockAttrs::default()
        },
        _ => BlockAttrs::default(),
    }
}
