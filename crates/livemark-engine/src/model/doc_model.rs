use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::parsing::blocks::{BlockAttrs, BlockType, build_block_attrs, classify_block_source};
use crate::parsing::inline::InlineSpan;
use crate::parsing::text::{LineIndex, Span, slice};
use crate::parsing::{ParseMeta, ParseReason, ParserKind};

use super::block_graph::{BlockNode, build_block_graph};

/// Characters of normalised block text used in a minted id.
const STABLE_KEY_CHARS: usize = 80;

/// Identifier of a logical block, stable across edits where possible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A classified top-level block of a committed model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub id: BlockId,
    pub from: usize,
    pub to: usize,
    #[serde(rename = "type")]
    pub kind: BlockType,
    /// 1-based line of the first character.
    pub line_from: usize,
    /// 1-based line of the last character.
    pub line_to: usize,
    pub attrs: BlockAttrs,
}

impl Block {
    pub fn span(&self) -> Span {
        Span::new(self.from, self.to)
    }
}

/// How a model came to be: the parse that produced it and the commit reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelMeta {
    pub parser: ParserKind,
    /// Why the session committed this model.
    pub reason: ParseReason,
    /// The reason the parser reported, e.g. a fallback cause.
    pub parse_reason: ParseReason,
    pub change_count: usize,
    pub reparsed_from: usize,
    pub reparsed_to: usize,
    pub reparsed_char_length: usize,
}

impl ModelMeta {
    pub fn committed(parse: ParseMeta, reason: ParseReason) -> Self {
        Self {
            parser: parse.parser,
            reason,
            parse_reason: parse.reason,
            change_count: parse.change_count,
            reparsed_from: parse.reparsed_from,
            reparsed_to: parse.reparsed_to,
            reparsed_char_length: parse.reparsed_char_length,
        }
    }

    fn empty() -> Self {
        Self {
            parser: ParserKind::None,
            reason: ParseReason::Empty,
            parse_reason: ParseReason::Empty,
            change_count: 0,
            reparsed_from: 0,
            reparsed_to: 0,
            reparsed_char_length: 0,
        }
    }
}

/// Immutable snapshot of a document: text, blocks, inline spans and version.
///
/// Built only by the session's commit step. A new snapshot replaces the old
/// one on every commit; the old one is kept just long enough to diff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocModel {
    version: u64,
    text: String,
    blocks: Vec<Block>,
    block_graph: Vec<BlockNode>,
    inline_spans: Vec<InlineSpan>,
    meta: ModelMeta,
}

impl DocModel {
    /// Version 0, no text, parser `none`.
    pub fn empty() -> Self {
        Self::build(0, String::new(), &[], &[], Vec::new(), ModelMeta::empty())
    }

    /// Builds a model from raw block ranges.
    ///
    /// `ids[i]` is the id carried over for `ranges[i]`; blocks without one get
    /// a minted `"{type}:{key}:{n}"` id that is unique within the model.
    pub(crate) fn build(
        version: u64,
        text: String,
        ranges: &[Span],
        ids: &[Option<BlockId>],
        inline_spans: Vec<InlineSpan>,
        meta: ModelMeta,
    ) -> Self {
        let len = text.len();
        let mut pairs: Vec<(Span, Option<BlockId>)> = ranges
            .iter()
            .enumerate()
            .filter_map(|(i, sp)| {
                let sp = Span::clamped(sp.start, sp.end, len)?;
                Some((sp, ids.get(i).cloned().flatten()))
            })
            .collect();
        pairs.sort_by_key(|(sp, _)| *sp);

        let blocks = enrich_blocks(&text, pairs);
        let block_graph = build_block_graph(&blocks);

        let mut inline_spans: Vec<InlineSpan> = inline_spans
            .into_iter()
            .filter_map(|s| Span::clamped(s.from, s.to, len).map(|sp| InlineSpan::new(sp, s.kind)))
            .collect();
        inline_spans.sort_by_key(|s| (s.from, s.to));

        Self {
            version,
            text,
            blocks,
            block_graph,
            inline_spans,
            meta,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block_graph(&self) -> &[BlockNode] {
        &self.block_graph
    }

    pub fn inline_spans(&self) -> &[InlineSpan] {
        &self.inline_spans
    }

    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    /// The leading frontmatter block, if the document has one.
    pub fn frontmatter(&self) -> Option<&Block> {
        self.blocks.iter().find(|b| b.kind == BlockType::Frontmatter)
    }

    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    /// Source text of a block.
    pub fn block_text(&self, block: &Block) -> &str {
        slice(&self.text, block.span())
    }
}

fn enrich_blocks(text: &str, pairs: Vec<(Span, Option<BlockId>)>) -> Vec<Block> {
    let lines = LineIndex::new(text);
    let mut used: HashSet<BlockId> = pairs.iter().filter_map(|(_, id)| id.clone()).collect();
    let mut occurrences: HashMap<String, usize> = HashMap::new();

    pairs
        .into_iter()
        .enumerate()
        .map(|(index, (sp, assigned))| {
            let source = slice(text, sp);
            let kind = classify_block_source(source, index == 0);
            let attrs = build_block_attrs(kind, source);

            let base = format!("{kind}:{}", stable_key(source));
            let seen = occurrences.entry(base.clone()).or_insert(0);
            *seen += 1;
            let id = match assigned {
                Some(id) => id,
                None => {
                    let mut n = *seen;
                    let mut candidate = BlockId(format!("{base}:{n}"));
                    while used.contains(&candidate) {
                        n += 1;
                        candidate = BlockId(format!("{base}:{n}"));
                    }
                    used.insert(candidate.clone());
                    candidate
                }
            };

            Block {
                id,
                from: sp.start,
                to: sp.end,
                kind,
                line_from: lines.line_of_offset(sp.start),
                line_to: lines.line_of_offset(sp.start.max(sp.end - 1)),
                attrs,
            }
        })
        .collect()
}

/// Whitespace-collapsed, lowercased prefix of a block's text.
fn stable_key(source: &str) -> String {
    let collapsed = source.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .chars()
        .take(STABLE_KEY_CHARS)
        .collect::<String>()
        .to_lowercase()
}
