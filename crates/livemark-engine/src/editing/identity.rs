//! Carrying block ids over from one model to the next.

use crate::model::{Block, BlockId};
use crate::parsing::text::Span;

/// Share of the longer block two ranges must have in common to count as
/// the same block.
pub const DEFAULT_MIN_COVERAGE: f64 = 0.45;

#[derive(Debug, Clone, Copy)]
struct Candidate {
    index: usize,
    coverage: f64,
    start_delta: usize,
    end_delta: usize,
}

impl Candidate {
    fn beats(&self, other: &Candidate) -> bool {
        if self.coverage != other.coverage {
            return self.coverage > other.coverage;
        }
        (self.start_delta, self.end_delta) < (other.start_delta, other.end_delta)
    }
}

/// Picks, for each freshly parsed range in `next`, the id of the previous
/// block it continues.
///
/// Ranges are matched in ascending order and each previous id is used at
/// most once, so the result depends on order. An exact range match wins;
/// otherwise the unused block with the highest coverage (then the smaller
/// start offset delta, then the smaller end offset delta) is taken if its
/// coverage reaches `min_coverage` or it starts at the same offset.
pub fn assign_stable_ids(previous: &[Block], next: &[Span], min_coverage: f64) -> Vec<Option<BlockId>> {
    let mut used = vec![false; previous.len()];

    next.iter()
        .map(|&span| {
            let exact = previous
                .iter()
                .enumerate()
                .position(|(i, b)| !used[i] && b.span() == span);
            let matched = exact.or_else(|| best_overlap(previous, &used, span, min_coverage));
            matched.map(|i| {
                used[i] = true;
                previous[i].id.clone()
            })
        })
        .collect()
}

fn best_overlap(previous: &[Block], used: &[bool], span: Span, min_coverage: f64) -> Option<usize> {
    let mut best: Option<Candidate> = None;
    for (index, block) in previous.iter().enumerate() {
        if used[index] {
            continue;
        }
        let prev = block.span();
        let overlap = prev.overlap_len(span);
        if overlap == 0 {
            continue;
        }
        let candidate = Candidate {
            index,
            coverage: overlap as f64 / prev.len().max(span.len()).max(1) as f64,
            start_delta: prev.start.abs_diff(span.start),
            end_delta: prev.end.abs_diff(span.end),
        };
        if best.is_none_or(|b| candidate.beats(&b)) {
            best = Some(candidate);
        }
    }

    best.filter(|b| b.coverage >= min_coverage || b.start_delta == 0)
        .map(|b| b.index)
}
