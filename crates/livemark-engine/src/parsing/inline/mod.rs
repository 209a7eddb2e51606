//! # Inline Parsing
//!
//! Cursor-based detection of inline constructs inside top-level blocks.
//!
//! Each detector makes its own pass over a block. Passes run in priority
//! order and share one list of claimed ranges:
//!
//! 1. wikilinks and embeds
//! 2. inline code
//! 3. `[label](url)` links
//! 4. strong
//! 5. emphasis
//!
//! ## Modules
//!
//! - **`types`**: `InlineSpan` and `InlineKind`
//! - **`kinds`**: delimiter constants (`CodeSpan`, `WikiLink`, `Link`, `Strong`, `Emphasis`)
//! - **`cursor`**: `Cursor` for byte-wise scanning with absolute positions
//! - **`builder`**: `build_inline_spans()` entry point and `try_parse_*` detectors

pub mod builder;
pub mod cursor;
pub mod kinds;
pub mod types;

pub use builder::{build_block_spans, build_inline_spans};
pub use types::{InlineKind, InlineSpan};
