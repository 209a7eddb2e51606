//! Position index over block ranges and rendered fragments.
//!
//! A renderer reports which source range each of its output fragments came
//! from. The index merges those with the model's blocks so a pointer or
//! cursor at a source offset can be resolved to the innermost thing drawn
//! there.

use std::collections::HashSet;

use serde::Serialize;

use crate::model::{Block, BlockId};
use crate::parsing::text::Span;

/// Priority of block entries; everything a renderer reports outranks them.
pub const BLOCK_PRIORITY: i32 = 0;
pub const DEFAULT_FRAGMENT_PRIORITY: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    Block,
    RenderedFragment,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Block => "block",
            EntryKind::RenderedFragment => "rendered-fragment",
        }
    }
}

/// A renderer's description of one output fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedFragment {
    pub fragment_id: Option<String>,
    pub block_id: Option<BlockId>,
    pub source_from: usize,
    pub source_to: usize,
    /// Bounds of the owning block; looked up from the blocks when absent.
    pub block_bounds: Option<Span>,
    /// Range in rendered output coordinates.
    pub fragment_bounds: Option<Span>,
    pub priority: Option<i32>,
}

impl RenderedFragment {
    pub fn new(source_from: usize, source_to: usize) -> Self {
        Self {
            source_from,
            source_to,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceMapEntry {
    pub id: String,
    pub kind: EntryKind,
    pub block_id: Option<BlockId>,
    pub fragment_id: Option<String>,
    pub source_from: usize,
    pub source_to: usize,
    pub block_from: usize,
    pub block_to: usize,
    pub fragment_from: Option<usize>,
    pub fragment_to: Option<usize>,
    pub priority: i32,
    /// The block overlaps the active line.
    pub active: bool,
}

impl SourceMapEntry {
    pub fn source(&self) -> Span {
        Span::new(self.source_from, self.source_to)
    }

    pub fn block_bounds(&self) -> Span {
        Span::new(self.block_from, self.block_to)
    }

    pub fn fragment_bounds(&self) -> Option<Span> {
        Span::clamped(self.fragment_from?, self.fragment_to?, usize::MAX)
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.source().contains(pos)
    }

    fn sort_key(&self) -> (usize, usize, std::cmp::Reverse<i32>, usize, usize, Option<usize>, Option<usize>, EntryKind) {
        (
            self.source_from,
            self.source_to,
            std::cmp::Reverse(self.priority),
            self.block_from,
            self.block_to,
            self.fragment_from,
            self.fragment_to,
            self.kind,
        )
    }
}

pub struct SourceMapInput<'a> {
    pub blocks: &'a [Block],
    pub rendered_fragments: &'a [RenderedFragment],
    /// Source range of the line holding the cursor.
    pub active_line: Option<Span>,
}

/// Result of [`SourceMapIndex::clamp_to_block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClampedPosition {
    pub position: usize,
    pub clamped: bool,
}

/// Result of [`SourceMapIndex::find_context`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMapContext<'a> {
    pub block_bounds: Option<Span>,
    pub fragment_bounds: Option<Span>,
    pub block: Option<&'a SourceMapEntry>,
    pub fragment: Option<&'a SourceMapEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceMapIndex {
    entries: Vec<SourceMapEntry>,
}

impl SourceMapIndex {
    pub fn build(input: SourceMapInput<'_>) -> Self {
        let active_line = input
            .active_line
            .and_then(|sp| Span::clamped(sp.start, sp.end, usize::MAX));

        let mut entries: Vec<SourceMapEntry> = input
            .blocks
            .iter()
            .filter_map(|block| block_entry(block, active_line))
            .chain(
                input
                    .rendered_fragments
                    .iter()
                    .enumerate()
                    .filter_map(|(index, fragment)| fragment_entry(fragment, index, input.blocks)),
            )
            .collect();
        entries.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        let mut seen = HashSet::new();
        entries.retain(|entry| seen.insert(entry.id.clone()));
        Self { entries }
    }

    pub fn entries(&self) -> &[SourceMapEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry whose source range contains `pos`, highest priority
    /// first, then narrowest.
    pub fn entries_at(&self, pos: usize) -> Vec<&SourceMapEntry> {
        let mut found: Vec<&SourceMapEntry> = self.entries.iter().filter(|e| e.contains(pos)).collect();
        found.sort_by_key(|e| (std::cmp::Reverse(e.priority), e.source().len()));
        found
    }

    /// The block entry at `pos`.
    ///
    /// A position just past a block's end (where the cursor sits after the
    /// last character) still resolves to that block; failing that, the block
    /// with the nearest edge within `tolerance` is returned.
    pub fn block_at(&self, pos: usize, tolerance: usize) -> Option<&SourceMapEntry> {
        let lookups = std::iter::once(pos).chain(pos.checked_sub(1));
        for lookup in lookups {
            if let Some(entry) = self
                .entries_at(lookup)
                .into_iter()
                .find(|e| e.kind == EntryKind::Block)
            {
                return Some(entry);
            }
        }

        let mut nearest: Option<(usize, &SourceMapEntry)> = None;
        for entry in self.entries.iter().filter(|e| e.kind == EntryKind::Block) {
            let distance = pos.abs_diff(entry.source_from).min(pos.abs_diff(entry.source_to));
            if nearest.is_none_or(|(best, _)| distance < best) {
                nearest = Some((distance, entry));
            }
        }
        nearest
            .filter(|(distance, _)| *distance <= tolerance)
            .map(|(_, entry)| entry)
    }

    /// Bounds of the block under `pos`, taken from a block entry if there is
    /// one, else from whatever entry is there.
    pub fn block_bounds_at(&self, pos: usize) -> Option<Span> {
        let found = self.entries_at(pos);
        found
            .iter()
            .find(|e| e.kind == EntryKind::Block)
            .or_else(|| found.first())
            .and_then(|e| Span::clamped(e.block_from, e.block_to, usize::MAX))
    }

    /// Clamps `pos` into an entry's source range.
    pub fn clamp_to_block(pos: usize, entry: &SourceMapEntry) -> ClampedPosition {
        let min = entry.source_from;
        let max = entry.source_to.max(min);
        let position = pos.clamp(min, max);
        ClampedPosition {
            position,
            clamped: position != pos,
        }
    }

    /// Finds the block starting at (or containing) `source_from` and the
    /// rendered fragment that belongs to it.
    ///
    /// `source_to` narrows the block match to an exact range. A fragment
    /// must match `fragment_range` exactly when one is given; otherwise the
    /// first fragment of the found block is used.
    pub fn find_context(
        &self,
        source_from: Option<usize>,
        source_to: Option<usize>,
        fragment_range: Option<Span>,
    ) -> SourceMapContext<'_> {
        let blocks = || self.entries.iter().filter(|e| e.kind == EntryKind::Block);
        let fragments = || {
            self.entries
                .iter()
                .filter(|e| e.kind == EntryKind::RenderedFragment)
        };

        let block = source_from.and_then(|from| {
            blocks()
                .find(|e| e.source_from == from && source_to.is_none_or(|to| e.source_to == to))
                .or_else(|| blocks().find(|e| e.contains(from)))
        });

        let same_block = |e: &SourceMapEntry| block.is_none_or(|b| e.block_bounds() == b.block_bounds());
        let fragment = fragment_range
            .and_then(|range| {
                fragments().find(|e| {
                    e.fragment_from == Some(range.start)
                        && e.fragment_to == Some(range.end)
                        && same_block(e)
                })
            })
            .or_else(|| block.and_then(|b| fragments().find(|e| e.block_bounds() == b.block_bounds())));

        SourceMapContext {
            block_bounds: block.and_then(|b| Span::clamped(b.block_from, b.block_to, usize::MAX)),
            fragment_bounds: fragment.and_then(SourceMapEntry::fragment_bounds),
            block,
            fragment,
        }
    }
}

fn block_entry(block: &Block, active_line: Option<Span>) -> Option<SourceMapEntry> {
    let span = Span::clamped(block.from, block.to, usize::MAX)?;
    let id = entry_identity(EntryKind::Block, Some(&block.id), None, span, BLOCK_PRIORITY);
    Some(SourceMapEntry {
        id,
        kind: EntryKind::Block,
        block_id: Some(block.id.clone()),
        fragment_id: None,
        source_from: span.start,
        source_to: span.end,
        block_from: span.start,
        block_to: span.end,
        fragment_from: None,
        fragment_to: None,
        priority: BLOCK_PRIORITY,
        active: active_line.is_some_and(|line| line.overlaps(span)),
    })
}

fn fragment_entry(fragment: &RenderedFragment, index: usize, blocks: &[Block]) -> Option<SourceMapEntry> {
    let span = Span::clamped(fragment.source_from, fragment.source_to, usize::MAX)?;
    let kind = EntryKind::RenderedFragment;
    let fragment_id = fragment
        .fragment_id
        .clone()
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("{}-{index}-{}-{}", kind.as_str(), span.start, span.end));
    let owner = fragment
        .block_id
        .as_ref()
        .and_then(|id| blocks.iter().find(|b| &b.id == id))
        .or_else(|| blocks.iter().find(|b| b.span().contains(span.start)));
    let block_bounds = fragment
        .block_bounds
        .or_else(|| owner.map(Block::span))
        .unwrap_or(span);
    let block_id = fragment
        .block_id
        .clone()
        .or_else(|| owner.map(|b| b.id.clone()));
    let priority = fragment.priority.unwrap_or(DEFAULT_FRAGMENT_PRIORITY);

    Some(SourceMapEntry {
        id: entry_identity(kind, block_id.as_ref(), Some(&fragment_id), span, priority),
        kind,
        block_id,
        fragment_id: Some(fragment_id),
        source_from: span.start,
        source_to: span.end,
        block_from: block_bounds.start,
        block_to: block_bounds.end,
        fragment_from: fragment.fragment_bounds.map(|f| f.start),
        fragment_to: fragment.fragment_bounds.map(|f| f.end),
        priority,
        active: false,
    })
}

fn entry_identity(
    kind: EntryKind,
    block_id: Option<&BlockId>,
    fragment_id: Option<&str>,
    span: Span,
    priority: i32,
) -> String {
    format!(
        "{}|{}|{}|{}:{}|{priority}",
        kind.as_str(),
        block_id.map(BlockId::as_str).unwrap_or_default(),
        fragment_id.unwrap_or_default(),
        span.start,
        span.end
    )
}
