//! Top-level block ranges for a piece of source text.
//!
//! Every path ends in [`normalize_ranges`], which is what guarantees the
//! output is sorted and non-overlapping.

use std::sync::OnceLock;

use regex::Regex;

use crate::parsing::text::{LineIndex, Span};

use super::semantics::extract_frontmatter_range;
use super::tokenizer::{BlockToken, BlockTokenizer};

/// Clamps each range to `[0, max_len]`, drops empty ones, sorts by
/// `(start, end)` and merges ranges that overlap.
///
/// Touching ranges (`a.end == b.start`) stay separate.
pub fn normalize_ranges(ranges: impl IntoIterator<Item = Span>, max_len: usize) -> Vec<Span> {
    let mut spans: Vec<Span> = ranges
        .into_iter()
        .filter_map(|r| Span::clamped(r.start, r.end, max_len))
        .collect();
    spans.sort();

    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for sp in spans {
        match merged.last_mut() {
            Some(prev) if sp.start < prev.end => prev.end = prev.end.max(sp.end),
            _ => merged.push(sp),
        }
    }
    merged
}

/// Builds absolute block ranges for `source`, which starts at `offset` in
/// the full document.
///
/// Frontmatter can only open the document, so it is peeled off first when
/// `offset` is 0. Without a tokenizer, or when it yields nothing usable,
/// blocks are split on blank lines.
pub fn build_block_ranges(
    tokenizer: Option<&dyn BlockTokenizer>,
    source: &str,
    offset: usize,
) -> Vec<Span> {
    if source.trim().is_empty() {
        return Vec::new();
    }

    let frontmatter = if offset == 0 {
        extract_frontmatter_range(source, offset)
    } else {
        None
    };
    let (rest, rest_offset) = match frontmatter {
        Some(fm) => (&source[fm.len()..], fm.end),
        None => (source, offset),
    };

    let mut ranges = match tokenizer {
        Some(tokenizer) => collect_token_ranges(&tokenizer.tokenize(rest), rest, rest_offset),
        None => Vec::new(),
    };
    if ranges.is_empty() {
        ranges = fallback_ranges(rest, rest_offset);
    }

    match frontmatter {
        Some(fm) => normalize_ranges(
            std::iter::once(fm).chain(ranges),
            offset + source.len(),
        ),
        None => ranges,
    }
}

fn collect_token_ranges(tokens: &[BlockToken], source: &str, offset: usize) -> Vec<Span> {
    let lines = LineIndex::new(source);
    let line_count = lines.line_count();
    let mut ranges: Vec<Span> = Vec::new();

    for token in tokens.iter().filter(|t| t.opens_top_level()) {
        let Some((start_line, end_line)) = token.map else {
            continue;
        };
        if end_line <= start_line {
            continue;
        }
        let start_line = start_line.min(line_count);
        let end_line = end_line.max(start_line + 1).min(line_count);
        let local = Span::new(lines.line_start(start_line), lines.line_start(end_line));
        if local.is_empty() || source[local.start..local.end].trim().is_empty() {
            continue;
        }
        let abs = local.shifted(offset);
        if !ranges.contains(&abs) {
            ranges.push(abs);
        }
    }

    normalize_ranges(ranges, offset + source.len())
}

fn blank_line_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\s*\n").expect("Invalid blank line regex"))
}

/// Splits `source` into paragraphs separated by blank lines.
fn fallback_ranges(source: &str, offset: usize) -> Vec<Span> {
    let mut ranges = Vec::new();
    let mut cursor = 0;
    let mut push_segment = |from: usize, to: usize| {
        let segment = &source[from..to];
        let lead = segment.len() - segment.trim_start_matches('\n').len();
        let body = segment[lead..]
            .strip_suffix('\n')
            .unwrap_or(&segment[lead..]);
        if !body.trim().is_empty() {
            let start = offset + from + lead;
            ranges.push(Span::new(start, start + body.len()));
        }
    };

    for sep in blank_line_separator().find_iter(source) {
        push_segment(cursor, sep.start());
        cursor = sep.end();
    }
    push_segment(cursor, source.len());

    normalize_ranges(ranges, offset + source.len())
}
