//! Edit transactions and their classification.
//!
//! A host editor hands the session an [`EditTransaction`]: the text before
//! and after, the individual change regions and a way to map old offsets to
//! new ones. [`classify`] flattens that into a [`TransactionClassification`].

use std::borrow::Cow;
use std::ops::Range;

use serde::Serialize;
use xi_rope::delta::{Builder, DeltaElement, Transformer};
use xi_rope::{Delta, Rope, RopeInfo};

use crate::mapping::position::{Assoc, MapError};
use crate::model::{ChangeRange, ChangeSpan};
use crate::parsing::text::{Span, floor_char_boundary};

/// Primary selection as anchor/head offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn cursor(pos: usize) -> Self {
        Self::new(pos, pos)
    }
}

/// The minimal shape of a host editor transaction.
pub trait EditTransaction {
    /// Whether the host considers the document changed.
    fn doc_changed(&self) -> bool;

    fn start_text(&self) -> Cow<'_, str>;

    fn end_text(&self) -> Cow<'_, str>;

    /// Calls `f` once per change region, in document order.
    fn iter_changes(&self, f: &mut dyn FnMut(ChangeSpan));

    /// Maps a pre-edit offset to a post-edit offset.
    fn map_pos(&self, pos: usize, assoc: Assoc) -> Result<usize, MapError>;

    fn previous_selection(&self) -> Option<Selection> {
        None
    }

    fn next_selection(&self) -> Option<Selection> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionClassification {
    pub doc_changed: bool,
    /// Both selections are known and differ.
    pub selection_set: bool,
    pub change_count: usize,
    pub change_spans: Vec<ChangeSpan>,
    pub change_ranges: Vec<ChangeRange>,
    pub old_changed_bounds: Option<Span>,
    pub new_changed_bounds: Option<Span>,
    pub previous_selection: Option<Selection>,
    pub next_selection: Option<Selection>,
}

/// Reads a transaction's change regions and selections.
pub fn classify<T: EditTransaction + ?Sized>(tx: &T) -> TransactionClassification {
    let mut change_spans = Vec::new();
    tx.iter_changes(&mut |span| {
        let span = ChangeSpan::new(
            span.old_from,
            span.old_to,
            span.new_from,
            span.new_to,
            span.inserted_text,
        );
        if !span.is_noop() {
            change_spans.push(span);
        }
    });

    let change_ranges: Vec<ChangeRange> = change_spans.iter().map(ChangeSpan::range).collect();
    let old_changed_bounds = bounds(change_ranges.iter().map(ChangeRange::old));
    let new_changed_bounds = bounds(change_ranges.iter().map(ChangeRange::new_range));

    let previous_selection = tx.previous_selection();
    let next_selection = tx.next_selection();
    let selection_set = matches!((previous_selection, next_selection), (Some(p), Some(n)) if p != n);

    TransactionClassification {
        doc_changed: tx.doc_changed() || !change_spans.is_empty(),
        selection_set,
        change_count: change_spans.len(),
        change_spans,
        change_ranges,
        old_changed_bounds,
        new_changed_bounds,
        previous_selection,
        next_selection,
    }
}

/// Union of possibly empty spans; unlike [`Span::union_of`] a lone
/// insertion point still yields bounds.
fn bounds(spans: impl Iterator<Item = Span>) -> Option<Span> {
    spans.reduce(|acc, sp| Span::new(acc.start.min(sp.start), acc.end.max(sp.end)))
}

/// Rebuilds the post-edit text by splicing `spans` into `previous`.
///
/// Spans are applied in `old_from` order; overlapping or out-of-range cuts
/// are clamped rather than rejected.
pub fn apply_change_spans_to_text(previous: &str, spans: &[ChangeSpan]) -> String {
    if spans.is_empty() {
        return previous.to_string();
    }
    let mut ordered: Vec<&ChangeSpan> = spans.iter().collect();
    ordered.sort_by_key(|s| s.old_from);

    let mut out = String::with_capacity(previous.len());
    let mut cursor = 0;
    for span in ordered {
        let from = floor_char_boundary(previous, span.old_from.max(cursor));
        let to = floor_char_boundary(previous, span.old_to.max(from));
        out.push_str(&previous[cursor..from]);
        out.push_str(&span.inserted_text);
        cursor = to;
    }
    out.push_str(&previous[cursor..]);
    out
}

/// Maps a pre-edit offset through a list of disjoint changes.
///
/// A position inside a replaced range goes to the start of the replacement
/// (or its end with [`Assoc::After`]); a position at an insertion point
/// stays before the inserted text unless `assoc` is `After`.
pub fn map_through_spans(spans: &[ChangeSpan], pos: usize, assoc: Assoc) -> usize {
    let mut ordered: Vec<&ChangeSpan> = spans.iter().collect();
    ordered.sort_by_key(|s| s.old_from);

    let mut shift: isize = 0;
    for s in ordered {
        if pos < s.old_from {
            break;
        }
        let old_len = s.old_to.saturating_sub(s.old_from);
        if s.old_to > pos || (s.old_to == pos && old_len == 0 && assoc == Assoc::Before) {
            return if pos == s.old_from || assoc == Assoc::Before {
                s.new_from
            } else {
                s.new_to
            };
        }
        shift += s.new_to.saturating_sub(s.new_from) as isize - old_len as isize;
    }
    pos.saturating_add_signed(shift)
}

/// A transaction backed by an `xi_rope` delta.
#[derive(Clone)]
pub struct DeltaTransaction {
    start: String,
    end: String,
    delta: Delta<RopeInfo>,
    previous_selection: Option<Selection>,
    next_selection: Option<Selection>,
}

impl DeltaTransaction {
    pub fn new(start_text: &str, delta: Delta<RopeInfo>) -> Self {
        let end = delta.apply(&Rope::from(start_text)).to_string();
        Self {
            start: start_text.to_string(),
            end,
            delta,
            previous_selection: None,
            next_selection: None,
        }
    }

    /// Builds the delta from `(range, replacement)` pairs in old coordinates.
    ///
    /// Ranges are clamped to the text and snapped to char boundaries; a range
    /// overlapping an earlier one is skipped.
    pub fn from_edits(start_text: &str, edits: &[(Range<usize>, &str)]) -> Self {
        let mut ordered: Vec<&(Range<usize>, &str)> = edits.iter().collect();
        ordered.sort_by_key(|(range, _)| range.start);

        let mut builder = Builder::new(start_text.len());
        let mut cursor = 0;
        for (range, insert) in ordered {
            let from = floor_char_boundary(start_text, range.start);
            let to = floor_char_boundary(start_text, range.end.max(from));
            if from < cursor {
                log::debug!("skipping overlapping edit {from}..{to}");
                continue;
            }
            if insert.is_empty() {
                if from < to {
                    builder.delete(from..to);
                }
            } else {
                builder.replace(from..to, Rope::from(*insert));
            }
            cursor = to;
        }
        Self::new(start_text, builder.build())
    }

    pub fn with_selections(mut self, previous: Selection, next: Selection) -> Self {
        self.previous_selection = Some(previous);
        self.next_selection = Some(next);
        self
    }

    pub fn delta(&self) -> &Delta<RopeInfo> {
        &self.delta
    }
}

impl EditTransaction for DeltaTransaction {
    fn doc_changed(&self) -> bool {
        !self.delta.is_identity()
    }

    fn start_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.start)
    }

    fn end_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.end)
    }

    fn iter_changes(&self, f: &mut dyn FnMut(ChangeSpan)) {
        let mut old_pos = 0;
        let mut new_pos = 0;
        // (old_from, new_from, inserted text)
        let mut pending: Option<(usize, usize, String)> = None;
        let mut flush = |pending: &mut Option<(usize, usize, String)>, old_to: usize| {
            if let Some((old_from, new_from, text)) = pending.take() {
                let new_to = new_from + text.len();
                f(ChangeSpan::new(old_from, old_to, new_from, new_to, text));
            }
        };

        for op in &self.delta.els {
            match op {
                DeltaElement::Copy(from, to) => {
                    if *from > old_pos && pending.is_none() {
                        pending = Some((old_pos, new_pos, String::new()));
                    }
                    flush(&mut pending, (*from).max(old_pos));
                    new_pos += to - from;
                    old_pos = *to;
                }
                DeltaElement::Insert(node) => {
                    let text = node.to_string();
                    let entry = pending.get_or_insert_with(|| (old_pos, new_pos, String::new()));
                    entry.2.push_str(&text);
                    new_pos += text.len();
                }
            }
        }
        if old_pos < self.delta.base_len && pending.is_none() {
            pending = Some((old_pos, new_pos, String::new()));
        }
        flush(&mut pending, self.delta.base_len.max(old_pos));
    }

    fn map_pos(&self, pos: usize, assoc: Assoc) -> Result<usize, MapError> {
        if pos > self.delta.base_len {
            return Err(MapError::OutOfRange {
                pos,
                len: self.delta.base_len,
            });
        }
        let mut transformer = Transformer::new(&self.delta);
        Ok(transformer.transform(pos, assoc.is_after()))
    }

    fn previous_selection(&self) -> Option<Selection> {
        self.previous_selection
    }

    fn next_selection(&self) -> Option<Selection> {
        self.next_selection
    }
}

/// A transaction described directly by its change spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanTransaction {
    start: String,
    end: String,
    spans: Vec<ChangeSpan>,
    previous_selection: Option<Selection>,
    next_selection: Option<Selection>,
}

impl SpanTransaction {
    /// The end text is derived by applying `spans` to `start_text`.
    ///
    /// Reversed endpoint pairs are swapped.
    pub fn new(start_text: impl Into<String>, spans: Vec<ChangeSpan>) -> Self {
        let start = start_text.into();
        let spans: Vec<ChangeSpan> = spans.into_iter().map(ChangeSpan::ordered).collect();
        let end = apply_change_spans_to_text(&start, &spans);
        Self {
            start,
            end,
            spans,
            previous_selection: None,
            next_selection: None,
        }
    }

    /// A single replacement of `from..to` with `insert`.
    pub fn replace(start_text: impl Into<String>, from: usize, to: usize, insert: &str) -> Self {
        let to = to.max(from);
        let span = ChangeSpan::new(from, to, from, from + insert.len(), insert);
        Self::new(start_text, vec![span])
    }

    /// A transaction that only moves the selection.
    pub fn selection_only(text: impl Into<String>, previous: Selection, next: Selection) -> Self {
        Self::new(text, Vec::new()).with_selections(previous, next)
    }

    pub fn with_selections(mut self, previous: Selection, next: Selection) -> Self {
        self.previous_selection = Some(previous);
        self.next_selection = Some(next);
        self
    }
}

impl EditTransaction for SpanTransaction {
    fn doc_changed(&self) -> bool {
        self.start != self.end
    }

    fn start_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.start)
    }

    fn end_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.end)
    }

    fn iter_changes(&self, f: &mut dyn FnMut(ChangeSpan)) {
        for span in &self.spans {
            f(span.clone());
        }
    }

    fn map_pos(&self, pos: usize, assoc: Assoc) -> Result<usize, MapError> {
        if pos > self.start.len() {
            return Err(MapError::OutOfRange {
                pos,
                len: self.start.len(),
            });
        }
        Ok(map_through_spans(&self.spans, pos, assoc))
    }

    fn previous_selection(&self) -> Option<Selection> {
        self.previous_selection
    }

    fn next_selection(&self) -> Option<Selection> {
        self.next_selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const SCENARIO: &str = "# Title\n\nParagraph one.\n\nParagraph two.\n";

    #[test]
    fn classify_replacement() {
        let tx = DeltaTransaction::from_edits(SCENARIO, &[(35..38, "TWO (edited)")]);
        let c = classify(&tx);
        assert!(c.doc_changed);
        assert!(!c.selection_set);
        assert_eq!(
            c.change_spans,
            vec![ChangeSpan::new(35, 38, 35, 47, "TWO (edited)")]
        );
        assert_eq!(c.old_changed_bounds, Some(Span::new(35, 38)));
        assert_eq!(c.new_changed_bounds, Some(Span::new(35, 47)));
        assert_eq!(
            apply_change_spans_to_text(SCENARIO, &c.change_spans),
            tx.end_text()
        );
    }

    #[test]
    fn classify_insertion_and_deletion() {
        let tx = DeltaTransaction::from_edits("Hello World", &[(5..5, " there")]);
        assert_eq!(
            classify(&tx).change_spans,
            vec![ChangeSpan::new(5, 5, 5, 11, " there")]
        );

        let tx = DeltaTransaction::from_edits("Hello World", &[(0..6, "")]);
        assert_eq!(tx.end_text(), "World");
        assert_eq!(
            classify(&tx).change_spans,
            vec![ChangeSpan::new(0, 6, 0, 0, "")]
        );
    }

    #[test]
    fn classify_multiple_edits_round_trips() {
        let text = "alpha beta gamma delta";
        let tx = DeltaTransaction::from_edits(text, &[(17..22, "DELTA"), (0..5, "A"), (11..11, "+")]);
        let c = classify(&tx);
        assert_eq!(c.change_count, 3);
        assert_eq!(c.old_changed_bounds, Some(Span::new(0, 22)));
        assert_eq!(
            apply_change_spans_to_text(text, &c.change_spans),
            "A beta +gamma DELTA"
        );
        assert_eq!(tx.end_text(), "A beta +gamma DELTA");
    }

    #[test]
    fn selection_only_is_not_a_doc_change() {
        let tx = SpanTransaction::selection_only("abc", Selection::cursor(0), Selection::cursor(2));
        let c = classify(&tx);
        assert!(!c.doc_changed);
        assert!(c.selection_set);
        assert_eq!(c.change_count, 0);
        assert_eq!(c.old_changed_bounds, None);
    }

    #[test]
    fn noop_spans_are_dropped() {
        let tx = SpanTransaction::new(
            "abc",
            vec![ChangeSpan::new(1, 1, 1, 1, ""), ChangeSpan::new(2, 3, 2, 2, "")],
        );
        let c = classify(&tx);
        assert_eq!(c.change_spans, vec![ChangeSpan::new(2, 3, 2, 2, "")]);
        assert_eq!(tx.end_text(), "ab");
    }

    #[test]
    fn splice_is_idempotent_and_clamped() {
        let spans = vec![ChangeSpan::new(4, 99, 4, 5, "!")];
        assert_eq!(apply_change_spans_to_text("abcdefg", &spans), "abcd!");
        assert_eq!(apply_change_spans_to_text("abcdefg", &spans), "abcd!");
        assert_eq!(apply_change_spans_to_text("abc", &[]), "abc");
    }

    #[test]
    fn splice_snaps_to_char_boundaries() {
        // "é" spans bytes 1..3; a cut at 2 snaps back to 1.
        let spans = vec![ChangeSpan::new(2, 3, 2, 3, "e")];
        assert_eq!(apply_change_spans_to_text("aéz", &spans), "aez");
    }

    #[rstest]
    #[case::before_insertion(2, Assoc::After, 2)]
    #[case::at_insertion_before(5, Assoc::Before, 5)]
    #[case::at_insertion_after(5, Assoc::After, 8)]
    #[case::after_insertion(7, Assoc::Before, 10)]
    fn map_through_insertion(#[case] pos: usize, #[case] assoc: Assoc, #[case] expected: usize) {
        let spans = [ChangeSpan::new(5, 5, 5, 8, "abc")];
        assert_eq!(map_through_spans(&spans, pos, assoc), expected);
    }

    #[rstest]
    #[case::inside(4, Assoc::Before, 2)]
    #[case::at_end(6, Assoc::After, 2)]
    #[case::past(8, Assoc::Before, 4)]
    fn map_through_deletion(#[case] pos: usize, #[case] assoc: Assoc, #[case] expected: usize) {
        let spans = [ChangeSpan::new(2, 6, 2, 2, "")];
        assert_eq!(map_through_spans(&spans, pos, assoc), expected);
    }

    #[test]
    fn delta_and_span_mapping_agree_outside_changes() {
        let delta_tx = DeltaTransaction::from_edits(SCENARIO, &[(35..38, "TWO (edited)")]);
        let span_tx = SpanTransaction::replace(SCENARIO, 35, 38, "TWO (edited)");
        assert_eq!(delta_tx.end_text(), span_tx.end_text());
        for (pos, assoc) in [(9, Assoc::Before), (10, Assoc::After), (40, Assoc::After)] {
            assert_eq!(delta_tx.map_pos(pos, assoc), span_tx.map_pos(pos, assoc));
        }
        assert_eq!(delta_tx.map_pos(40, Assoc::After), Ok(49));
    }

    #[test]
    fn reversed_spans_are_reordered() {
        let reversed = ChangeSpan {
            old_from: 5,
            old_to: 2,
            new_from: 3,
            new_to: 2,
            inserted_text: "X".to_string(),
        };
        let tx = SpanTransaction::new("abcdefg", vec![reversed.clone()]);
        assert_eq!(tx.end_text(), "abXfg");
        assert_eq!(tx.map_pos(6, Assoc::Before), Ok(4));
        assert_eq!(classify(&tx).change_spans, vec![ChangeSpan::new(2, 5, 2, 3, "X")]);
        // Unnormalised spans passed straight to the mapper still map.
        assert_eq!(map_through_spans(&[reversed], 6, Assoc::Before), 6);
    }

    #[test]
    fn map_pos_rejects_positions_past_the_end() {
        let tx = SpanTransaction::replace("abc", 0, 1, "x");
        assert_eq!(
            tx.map_pos(4, Assoc::Before),
            Err(MapError::OutOfRange { pos: 4, len: 3 })
        );
        let tx = DeltaTransaction::from_edits("abc", &[(0..1, "x")]);
        assert!(tx.map_pos(9, Assoc::After).is_err());
    }
}
