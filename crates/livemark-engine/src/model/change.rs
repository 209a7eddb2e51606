use serde::Serialize;

use crate::parsing::text::Span;

/// One edit region of a transaction, in both old and new coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeSpan {
    pub old_from: usize,
    pub old_to: usize,
    pub new_from: usize,
    pub new_to: usize,
    pub inserted_text: String,
}

impl ChangeSpan {
    /// Builds a span with both ranges normalised so `to >= from`.
    pub fn new(
        old_from: usize,
        old_to: usize,
        new_from: usize,
        new_to: usize,
        inserted_text: impl Into<String>,
    ) -> Self {
        Self {
            old_from,
            old_to: old_to.max(old_from),
            new_from,
            new_to: new_to.max(new_from),
            inserted_text: inserted_text.into(),
        }
    }

    /// Copy with each endpoint pair in ascending order.
    pub fn ordered(self) -> Self {
        Self {
            old_from: self.old_from.min(self.old_to),
            old_to: self.old_from.max(self.old_to),
            new_from: self.new_from.min(self.new_to),
            new_to: self.new_from.max(self.new_to),
            inserted_text: self.inserted_text,
        }
    }

    pub fn range(&self) -> ChangeRange {
        ChangeRange {
            old_from: self.old_from,
            old_to: self.old_to,
            new_from: self.new_from,
            new_to: self.new_to,
        }
    }

    /// True when the span neither removes nor inserts anything.
    pub fn is_noop(&self) -> bool {
        self.old_from == self.old_to && self.new_from == self.new_to && self.inserted_text.is_empty()
    }
}

/// A [`ChangeSpan`] without its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ChangeRange {
    pub old_from: usize,
    pub old_to: usize,
    pub new_from: usize,
    pub new_to: usize,
}

impl ChangeRange {
    pub fn old(&self) -> Span {
        Span::new(self.old_from, self.old_to)
    }

    pub fn new_range(&self) -> Span {
        Span::new(self.new_from, self.new_to)
    }

    /// Copy with `to >= from` on both sides.
    pub fn normalized(self) -> Self {
        Self {
            old_from: self.old_from,
            old_to: self.old_to.max(self.old_from),
            new_from: self.new_from,
            new_to: self.new_to.max(self.new_from),
        }
    }
}
