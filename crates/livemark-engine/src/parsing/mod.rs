//! # Parsing
//!
//! Text → top-level block ranges → inline spans, either for a whole document
//! or for a bounded window around an edit.
//!
//! - **`text`**: spans, line index and char-safe slicing
//! - **`blocks`**: block ranges, tokenizers and block classification
//! - **`inline`**: inline span detection
//! - **`incremental`**: `IncrementalMarkdownParser`, full vs. windowed re-parse

pub mod blocks;
pub mod incremental;
pub mod inline;
pub mod text;

#[cfg(test)]
pub(crate) mod tests;

pub use incremental::{
    DEFAULT_MAX_INCREMENTAL_WINDOW_CHARS, IncrementalMarkdownParser, IncrementalRequest,
    MarkdownParser, ParseError, ParseMeta, ParseReason, ParseResult, ParserKind, ParserOptions,
};
