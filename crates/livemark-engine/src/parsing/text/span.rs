use serde::Serialize;

/// A byte range `[start, end)` into the document text.
///
/// Blocks, inline spans and source-map entries all store spans rather than
/// copied text, so slicing the document with any span reproduces the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Builds a span from possibly inverted bounds, clamped to `max`.
    ///
    /// Returns `None` when nothing non-empty remains.
    pub fn clamped(start: usize, end: usize, max: usize) -> Option<Self> {
        let start = start.min(max);
        let end = end.max(start).min(max);
        (end > start).then_some(Self { start, end })
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Half-open containment: `start <= pos < end`.
    #[must_use]
    pub fn contains(self, pos: usize) -> bool {
        pos >= self.start && pos < self.end
    }

    /// True when the two spans share at least one byte.
    #[must_use]
    pub fn overlaps(self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Number of bytes shared by both spans.
    #[must_use]
    pub fn overlap_len(self, other: Span) -> usize {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        end.saturating_sub(start)
    }

    /// Shifts both ends by `offset`.
    #[must_use]
    pub fn shifted(self, offset: usize) -> Span {
        Span {
            start: self.start + offset,
            end: self.end + offset,
        }
    }

    /// Smallest span covering every span in `spans`.
    pub fn union_of(spans: impl IntoIterator<Item = Span>) -> Option<Span> {
        spans.into_iter().fold(None, |acc, sp| {
            Some(match acc {
                None => sp,
                Some(acc) => Span {
                    start: acc.start.min(sp.start),
                    end: acc.end.max(sp.end),
                },
            })
        })
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(r: std::ops::Range<usize>) -> Self {
        Span {
            start: r.start,
            end: r.end,
        }
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(sp: Span) -> Self {
        sp.start..sp.end
    }
}
