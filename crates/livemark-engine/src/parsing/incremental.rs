//! Full and windowed re-parsing.
//!
//! The incremental path re-parses only the blocks touched by an edit, plus
//! one neighbour on each side, and reuses every other block by mapping its
//! range through the edit. Anything that stops the window from being
//! computed, or a window larger than the configured budget, falls back to a
//! full parse tagged with the reason.

use serde::Serialize;
use thiserror::Error;

use crate::mapping::position::{Assoc, PositionMapper, map_or_clamp};
use crate::model::{ChangeRange, DocModel};

use super::blocks::kinds::{CodeFence, Frontmatter};
use super::blocks::{BlockTokenizer, PulldownTokenizer, build_block_ranges, normalize_ranges};
use super::inline::{InlineSpan, build_inline_spans};
use super::text::{Span, slice};

pub const DEFAULT_MAX_INCREMENTAL_WINDOW_CHARS: usize = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Largest re-parse window, in bytes, before giving up on reuse.
    pub max_incremental_window_chars: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_incremental_window_chars: DEFAULT_MAX_INCREMENTAL_WINDOW_CHARS,
        }
    }
}

/// Which parse produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    Full,
    Incremental,
    /// The empty model nobody parsed.
    None,
}

impl ParserKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ParserKind::Full => "full",
            ParserKind::Incremental => "incremental",
            ParserKind::None => "none",
        }
    }
}

impl std::fmt::Display for ParserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a parse or commit happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseReason {
    Empty,
    FullParse,
    SetText,
    EnsureTextSync,
    TransactionResyncStartState,
    TransactionDelta,
    IncrementalParseFailed,
    MissingPreviousBlocks,
    MissingChangeRanges,
    MissingOldChangeBounds,
    IncrementalWindowTooLarge,
}

impl ParseReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ParseReason::Empty => "empty",
            ParseReason::FullParse => "full-parse",
            ParseReason::SetText => "set-text",
            ParseReason::EnsureTextSync => "ensure-text-sync",
            ParseReason::TransactionResyncStartState => "transaction-resync-start-state",
            ParseReason::TransactionDelta => "transaction-delta",
            ParseReason::IncrementalParseFailed => "incremental-parse-failed",
            ParseReason::MissingPreviousBlocks => "missing-previous-blocks",
            ParseReason::MissingChangeRanges => "missing-change-ranges",
            ParseReason::MissingOldChangeBounds => "missing-old-change-bounds",
            ParseReason::IncrementalWindowTooLarge => "incremental-window-too-large",
        }
    }
}

impl std::fmt::Display for ParseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParseMeta {
    pub parser: ParserKind,
    pub reason: ParseReason,
    pub change_count: usize,
    pub reparsed_from: usize,
    pub reparsed_to: usize,
    pub reparsed_char_length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    /// Sorted, non-overlapping block ranges.
    pub blocks: Vec<Span>,
    pub inline_spans: Vec<InlineSpan>,
    pub meta: ParseMeta,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("re-parse window {from}..{to} does not fall on char boundaries")]
    SplitChar { from: usize, to: usize },
}

/// Inputs to one incremental parse.
pub struct IncrementalRequest<'a> {
    pub previous_model: Option<&'a DocModel>,
    pub next_text: &'a str,
    pub change_ranges: &'a [ChangeRange],
    pub mapper: &'a dyn PositionMapper,
}

/// A parser a `DocumentSession` can drive.
pub trait MarkdownParser {
    fn parse_full(&self, text: &str, reason: ParseReason) -> ParseResult;

    /// Windowed re-parse. Recoverable problems fall back to
    /// [`MarkdownParser::parse_full`] internally; an `Err` asks the caller to
    /// do a full parse itself.
    fn parse_incremental(&self, request: IncrementalRequest<'_>) -> Result<ParseResult, ParseError>;
}

/// The default parser: block ranges from a [`BlockTokenizer`] (or the
/// blank-line splitter when there is none) plus inline spans.
pub struct IncrementalMarkdownParser {
    tokenizer: Option<Box<dyn BlockTokenizer>>,
    options: ParserOptions,
}

impl Default for IncrementalMarkdownParser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

impl IncrementalMarkdownParser {
    /// Parser using the pulldown-cmark tokenizer.
    pub fn new(options: ParserOptions) -> Self {
        Self {
            tokenizer: Some(Box::new(PulldownTokenizer)),
            options,
        }
    }

    pub fn with_tokenizer(tokenizer: Box<dyn BlockTokenizer>, options: ParserOptions) -> Self {
        Self {
            tokenizer: Some(tokenizer),
            options,
        }
    }

    /// Parser that only splits on blank lines.
    pub fn without_tokenizer(options: ParserOptions) -> Self {
        Self {
            tokenizer: None,
            options,
        }
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    fn ranges(&self, source: &str, offset: usize) -> Vec<Span> {
        build_block_ranges(self.tokenizer.as_deref(), source, offset)
    }

    fn fallback(&self, text: &str, reason: ParseReason) -> Result<ParseResult, ParseError> {
        log::debug!("incremental parse falling back to full parse: {reason}");
        Ok(self.parse_full(text, reason))
    }
}

impl MarkdownParser for IncrementalMarkdownParser {
    fn parse_full(&self, text: &str, reason: ParseReason) -> ParseResult {
        let blocks = self.ranges(text, 0);
        let inline_spans = build_inline_spans(text, &blocks);
        ParseResult {
            blocks,
            inline_spans,
            meta: ParseMeta {
                parser: ParserKind::Full,
                reason,
                change_count: 0,
                reparsed_from: 0,
                reparsed_to: text.len(),
                reparsed_char_length: text.len(),
            },
        }
    }

    fn parse_incremental(&self, request: IncrementalRequest<'_>) -> Result<ParseResult, ParseError> {
        let text = request.next_text;
        let len = text.len();
        let change_ranges = normalize_change_ranges(request.change_ranges);
        let previous_blocks: Vec<Span> = request
            .previous_model
            .map(|m| m.blocks().iter().map(|b| b.span()).collect())
            .unwrap_or_default();

        if change_ranges.is_empty() {
            return self.fallback(text, ParseReason::MissingChangeRanges);
        }
        if previous_blocks.is_empty() {
            return self.fallback(text, ParseReason::MissingPreviousBlocks);
        }
        let Some(bounds) = old_change_bounds(&change_ranges) else {
            return self.fallback(text, ParseReason::MissingOldChangeBounds);
        };

        let previous_text = request.previous_model.map(DocModel::text).unwrap_or_default();
        let mut window = impacted_window(&previous_blocks, bounds, previous_text.len());
        let mapper = request.mapper;
        let new_from = map_or_clamp(mapper, window.start, Assoc::Before, window.start, len);
        let new_to = map_or_clamp(mapper, window.end, Assoc::After, window.end, len);
        let mut reparsed = Span::new(new_from.min(new_to), new_from.max(new_to));

        // A fence opened or closed inside the window changes everything after it.
        let at_start = window.start == 0;
        if delimiter_lines(slice(previous_text, window), at_start)
            != delimiter_lines(slice(text, reparsed), at_start)
        {
            window = Span::new(window.start, previous_text.len().max(window.end));
            reparsed = Span::new(reparsed.start, len);
        }
        log::trace!(
            "incremental window old {}..{} -> new {}..{}",
            window.start,
            window.end,
            reparsed.start,
            reparsed.end
        );

        if reparsed.len() > self.options.max_incremental_window_chars {
            return self.fallback(text, ParseReason::IncrementalWindowTooLarge);
        }
        if !text.is_char_boundary(reparsed.start) || !text.is_char_boundary(reparsed.end) {
            return Err(ParseError::SplitChar {
                from: reparsed.start,
                to: reparsed.end,
            });
        }

        let reparsed_blocks = self.ranges(&text[reparsed.start..reparsed.end], reparsed.start);

        let prefix = previous_blocks.iter().filter(|b| b.end <= window.start);
        let suffix = previous_blocks.iter().filter(|b| b.start >= window.end);
        let blocks = normalize_ranges(
            prefix
                .filter_map(|b| map_span(mapper, *b, len))
                .chain(reparsed_blocks.iter().copied())
                .chain(suffix.filter_map(|b| map_span(mapper, *b, len))),
            len,
        );

        let previous_spans = request
            .previous_model
            .map(|m| m.inline_spans())
            .unwrap_or_default();
        let reuse = |keep: &dyn Fn(&InlineSpan) -> bool| -> Vec<InlineSpan> {
            previous_spans
                .iter()
                .filter(|s| keep(s))
                .filter_map(|s| {
                    map_span(mapper, s.span(), len).map(|sp| InlineSpan::new(sp, s.kind))
                })
                .collect()
        };
        let mut inline_spans = reuse(&|s| s.to <= window.start);
        inline_spans.extend(build_inline_spans(text, &reparsed_blocks));
        inline_spans.extend(reuse(&|s| s.from >= window.end));
        inline_spans.retain(|s| s.to.min(len) > s.from);
        inline_spans.sort_by_key(|s| (s.from, s.to));

        Ok(ParseResult {
            blocks,
            inline_spans,
            meta: ParseMeta {
                parser: ParserKind::Incremental,
                reason: ParseReason::TransactionDelta,
                change_count: change_ranges.len(),
                reparsed_from: reparsed.start,
                reparsed_to: reparsed.end,
                reparsed_char_length: reparsed.len(),
            },
        })
    }
}

fn normalize_change_ranges(ranges: &[ChangeRange]) -> Vec<ChangeRange> {
    let mut out: Vec<ChangeRange> = ranges.iter().map(|r| r.normalized()).collect();
    out.sort_by_key(|r| (r.old_from, r.old_to));
    out
}

/// Union of all changes in pre-edit coordinates.
fn old_change_bounds(ranges: &[ChangeRange]) -> Option<Span> {
    let from = ranges.iter().map(|r| r.old_from).min()?;
    let to = ranges.iter().map(|r| r.old_to).max()?;
    Some(Span::new(from, to.max(from)))
}

/// Old-coordinate range covering every block the change touches, widened by
/// one block on each side.
///
/// A change that touches no block (e.g. an insertion in the gap between two
/// blocks) uses the blocks on either side of the insertion point. A window
/// that reaches the first or last block extends to the document edge, so
/// text before the first block or after the last one is re-parsed too.
fn impacted_window(blocks: &[Span], bounds: Span, text_len: usize) -> Span {
    let overlapping = |b: &Span| b.end > bounds.start && b.start < bounds.end;
    let (first, last) = match (
        blocks.iter().position(overlapping),
        blocks.iter().rposition(overlapping),
    ) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            let insertion = blocks
                .iter()
                .position(|b| b.start >= bounds.start)
                .unwrap_or(blocks.len());
            (
                insertion.saturating_sub(1),
                insertion.min(blocks.len() - 1),
            )
        }
    };

    let lo = first.saturating_sub(1);
    let hi = (last + 1).min(blocks.len() - 1);
    let start = if lo == 0 { 0 } else { blocks[lo].start };
    let end = if hi == blocks.len() - 1 {
        text_len.max(blocks[hi].end).max(bounds.end)
    } else {
        blocks[hi].end
    };
    Span::new(start.min(end), start.max(end))
}

/// Lines that decide how the text after them parses: fence lines, plus the
/// opening frontmatter delimiter when `text` starts the document.
fn delimiter_lines(text: &str, at_document_start: bool) -> Vec<&str> {
    let mut lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| CodeFence::leading_run(line) >= CodeFence::MIN_RUN)
        .collect();
    if at_document_start && text.lines().next() == Some(Frontmatter::FENCE) {
        lines.insert(0, Frontmatter::FENCE);
    }
    lines
}

/// Maps a reused range through the edit; `None` when it collapses.
fn map_span(mapper: &dyn PositionMapper, sp: Span, len: usize) -> Option<Span> {
    let from = map_or_clamp(mapper, sp.start, Assoc::Before, sp.start, len);
    let to = map_or_clamp(mapper, sp.end, Assoc::After, sp.end, len);
    Span::clamped(from.min(to), from.max(to), len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn spans(pairs: &[(usize, usize)]) -> Vec<Span> {
        pairs.iter().map(|&(a, b)| Span::new(a, b)).collect()
    }

    #[test]
    fn window_widens_by_one_block_each_side() {
        let blocks = spans(&[(0, 5), (6, 10), (11, 20), (21, 30), (31, 40)]);
        assert_eq!(impacted_window(&blocks, Span::new(12, 14), 41), Span::new(6, 30));
    }

    #[test]
    fn window_clamps_at_document_edges() {
        let blocks = spans(&[(2, 5), (6, 10)]);
        assert_eq!(impacted_window(&blocks, Span::new(3, 4), 12), Span::new(0, 12));
    }

    #[test]
    fn insertion_between_blocks_uses_neighbours() {
        let blocks = spans(&[(0, 5), (6, 10), (11, 20), (21, 30)]);
        // Zero-width insertion at 10 overlaps nothing; insertion point is block 2.
        assert_eq!(impacted_window(&blocks, Span::new(10, 10), 31), Span::new(0, 31));
    }

    #[test]
    fn insertion_after_last_block() {
        let blocks = spans(&[(0, 5), (6, 10)]);
        assert_eq!(impacted_window(&blocks, Span::new(12, 12), 12), Span::new(0, 12));
    }

    #[test]
    fn insertion_before_first_block_starts_at_zero() {
        let blocks = spans(&[(2, 6), (7, 12), (13, 20), (21, 30)]);
        assert_eq!(impacted_window(&blocks, Span::new(0, 0), 31), Span::new(0, 12));
    }

    #[test]
    fn fence_lines_are_compared_trimmed() {
        assert_eq!(delimiter_lines("a\n\n ```rust\nx\n```\n", false), vec!["```rust", "```"]);
        assert_eq!(delimiter_lines("---\na: 1\n", true), vec!["---"]);
        assert!(delimiter_lines("---\n", false).is_empty());
        assert!(delimiter_lines("``x``\n", false).is_empty());
    }

    #[test]
    fn change_bounds_are_the_union() {
        let ranges = [
            ChangeRange {
                old_from: 9,
                old_to: 12,
                new_from: 9,
                new_to: 9,
            },
            ChangeRange {
                old_from: 2,
                old_to: 3,
                new_from: 2,
                new_to: 5,
            },
        ];
        assert_eq!(old_change_bounds(&ranges), Some(Span::new(2, 12)));
        assert_eq!(old_change_bounds(&[]), None);
    }

    #[test]
    fn full_parse_meta() {
        let parser = IncrementalMarkdownParser::default();
        let result = parser.parse_full("# T\n\nbody *x*\n", ParseReason::FullParse);
        assert_eq!(result.blocks, spans(&[(0, 4), (5, 14)]));
        assert_eq!(result.meta.parser, ParserKind::Full);
        assert_eq!(result.meta.reparsed_char_length, 14);
        assert_eq!(result.inline_spans.len(), 1);
    }

    #[test]
    fn missing_inputs_fall_back() {
        let parser = IncrementalMarkdownParser::default();
        let mapper = crate::mapping::position::IdentityMapper;
        let result = parser
            .parse_incremental(IncrementalRequest {
                previous_model: None,
                next_text: "text\n",
                change_ranges: &[],
                mapper: &mapper,
            })
            .unwrap();
        assert_eq!(result.meta.parser, ParserKind::Full);
        assert_eq!(result.meta.reason, ParseReason::MissingChangeRanges);

        let result = parser
            .parse_incremental(IncrementalRequest {
                previous_model: None,
                next_text: "text\n",
                change_ranges: &[ChangeRange {
                    old_from: 0,
                    old_to: 0,
                    new_from: 0,
                    new_to: 1,
                }],
                mapper: &mapper,
            })
            .unwrap();
        assert_eq!(result.meta.reason, ParseReason::MissingPreviousBlocks);
    }

    #[test]
    fn reason_strings() {
        assert_eq!(
            ParseReason::IncrementalWindowTooLarge.as_str(),
            "incremental-window-too-large"
        );
        assert_eq!(ParseReason::TransactionDelta.to_string(), "transaction-delta");
    }
}
