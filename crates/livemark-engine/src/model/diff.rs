//! Structural comparison of two committed models.
//!
//! Two views of block churn are reported side by side: range sets, which
//! ignore identity, and id sets, which trust the ids the session assigned.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::parsing::inline::{InlineKind, InlineSpan};
use crate::parsing::text::Span;

use super::doc_model::{Block, BlockId, DocModel};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModelDiff {
    pub text_changed: bool,
    /// Block ranges present only in the next model.
    pub added_ranges: Vec<Span>,
    /// Block ranges present only in the previous model.
    pub removed_ranges: Vec<Span>,
    pub added_ids: Vec<BlockId>,
    pub removed_ids: Vec<BlockId>,
    /// Ids in both models whose range, type or attrs differ.
    pub updated_ids: Vec<BlockId>,
    pub added_inline_spans: Vec<InlineSpan>,
    pub removed_inline_spans: Vec<InlineSpan>,
    pub block_delta: isize,
    pub inline_span_delta: isize,
    pub previous_block_count: usize,
    pub next_block_count: usize,
    /// Bounds of every added and removed range.
    pub changed_range: Option<Span>,
}

impl ModelDiff {
    /// True when any block range appeared or disappeared.
    pub fn block_changed(&self) -> bool {
        !self.added_ranges.is_empty() || !self.removed_ranges.is_empty()
    }

    /// True when the models are structurally identical.
    pub fn is_unchanged(&self) -> bool {
        !self.text_changed
            && !self.block_changed()
            && self.added_ids.is_empty()
            && self.removed_ids.is_empty()
            && self.updated_ids.is_empty()
            && self.added_inline_spans.is_empty()
            && self.removed_inline_spans.is_empty()
    }
}

/// Compares `previous` with `next`. Neither model is touched.
pub fn diff_doc_models(previous: &DocModel, next: &DocModel) -> ModelDiff {
    let prev_blocks = previous.blocks();
    let next_blocks = next.blocks();

    let prev_ranges: HashSet<Span> = prev_blocks.iter().map(Block::span).collect();
    let next_ranges: HashSet<Span> = next_blocks.iter().map(Block::span).collect();
    let added_ranges: Vec<Span> = next_blocks
        .iter()
        .map(Block::span)
        .filter(|sp| !prev_ranges.contains(sp))
        .collect();
    let removed_ranges: Vec<Span> = prev_blocks
        .iter()
        .map(Block::span)
        .filter(|sp| !next_ranges.contains(sp))
        .collect();

    let prev_by_id: HashMap<&BlockId, &Block> = prev_blocks.iter().map(|b| (&b.id, b)).collect();
    let next_by_id: HashMap<&BlockId, &Block> = next_blocks.iter().map(|b| (&b.id, b)).collect();
    let mut added_ids = Vec::new();
    let mut updated_ids = Vec::new();
    for block in next_blocks {
        match prev_by_id.get(&block.id) {
            None => added_ids.push(block.id.clone()),
            Some(prev) if block_moved_or_changed(prev, block) => updated_ids.push(block.id.clone()),
            Some(_) => {}
        }
    }
    let removed_ids: Vec<BlockId> = prev_blocks
        .iter()
        .filter(|b| !next_by_id.contains_key(&b.id))
        .map(|b| b.id.clone())
        .collect();

    let prev_spans: HashSet<(usize, usize, InlineKind)> =
        previous.inline_spans().iter().map(inline_key).collect();
    let next_spans: HashSet<(usize, usize, InlineKind)> =
        next.inline_spans().iter().map(inline_key).collect();
    let added_inline_spans = next
        .inline_spans()
        .iter()
        .filter(|s| !prev_spans.contains(&inline_key(s)))
        .copied()
        .collect();
    let removed_inline_spans = previous
        .inline_spans()
        .iter()
        .filter(|s| !next_spans.contains(&inline_key(s)))
        .copied()
        .collect();

    let changed_range = Span::union_of(added_ranges.iter().chain(&removed_ranges).copied());

    ModelDiff {
        text_changed: previous.text() != next.text(),
        added_ranges,
        removed_ranges,
        added_ids,
        removed_ids,
        updated_ids,
        added_inline_spans,
        removed_inline_spans,
        block_delta: next_blocks.len() as isize - prev_blocks.len() as isize,
        inline_span_delta: next.inline_spans().len() as isize
            - previous.inline_spans().len() as isize,
        previous_block_count: prev_blocks.len(),
        next_block_count: next_blocks.len(),
        changed_range,
    }
}

fn block_moved_or_changed(prev: &Block, next: &Block) -> bool {
    prev.from != next.from || prev.to != next.to || prev.kind != next.kind || prev.attrs != next.attrs
}

fn inline_key(span: &InlineSpan) -> (usize, usize, InlineKind) {
    (span.from, span.to, span.kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelMeta;
    use crate::parsing::{IncrementalMarkdownParser, MarkdownParser, ParseReason};
    use pretty_assertions::assert_eq;

    fn model(text: &str, ids: &[&str]) -> DocModel {
        let parsed = IncrementalMarkdownParser::default().parse_full(text, ParseReason::FullParse);
        let ids: Vec<Option<BlockId>> = ids.iter().map(|id| Some(BlockId::from(*id))).collect();
        DocModel::build(
            1,
            text.to_string(),
            &parsed.blocks,
            &ids,
            parsed.inline_spans,
            ModelMeta::committed(parsed.meta, ParseReason::SetText),
        )
    }

    #[test]
    fn identical_models_are_unchanged() {
        let a = model("# T\n\nbody\n", &["h", "p"]);
        let diff = diff_doc_models(&a, &a.clone());
        assert!(diff.is_unchanged());
        assert!(!diff.block_changed());
        assert_eq!(diff.changed_range, None);
        assert_eq!(diff.block_delta, 0);
    }

    #[test]
    fn grown_block_is_updated_and_range_churns() {
        let a = model("# T\n\nbody\n", &["h", "p"]);
        let b = model("# T\n\nbody *more*\n", &["h", "p"]);
        let diff = diff_doc_models(&a, &b);
        assert!(diff.text_changed);
        assert_eq!(diff.updated_ids, vec![BlockId::from("p")]);
        assert!(diff.added_ids.is_empty());
        assert_eq!(diff.added_ranges, vec![Span::new(5, 17)]);
        assert_eq!(diff.removed_ranges, vec![Span::new(5, 10)]);
        assert_eq!(diff.changed_range, Some(Span::new(5, 17)));
        assert_eq!(diff.inline_span_delta, 1);
        assert_eq!(diff.added_inline_spans.len(), 1);
        assert_eq!(diff.added_inline_spans[0].kind, InlineKind::Emphasis);
    }

    #[test]
    fn new_ids_are_added_and_missing_ids_removed() {
        let a = model("one\n\ntwo\n", &["a", "b"]);
        let b = model("one\n\ntwo\n\nthree\n", &["a", "c", "d"]);
        let diff = diff_doc_models(&a, &b);
        assert_eq!(diff.added_ids, vec![BlockId::from("c"), BlockId::from("d")]);
        assert_eq!(diff.removed_ids, vec![BlockId::from("b")]);
        assert_eq!(diff.added_ranges, vec![Span::new(10, 16)]);
        assert!(diff.removed_ranges.is_empty());
        assert_eq!(diff.block_delta, 1);
        assert_eq!((diff.previous_block_count, diff.next_block_count), (2, 3));
    }
}
