//! # Block Parsing
//!
//! Cuts source text into top-level blocks and classifies them.
//!
//! ## Modules
//!
//! - **`kinds`**: construct-specific delimiter knowledge (fences, quotes, list markers, ...)
//! - **`semantics`**: `classify_block_source` and frontmatter detection
//! - **`tokenizer`**: `BlockTokenizer` trait with pulldown-cmark and tree-sitter backends
//! - **`graph`**: `build_block_ranges`, turning tokens into absolute block ranges
//! - **`types`**: `BlockType` and `BlockAttrs`
//!
//! ## Key Invariants
//!
//! - Ranges returned by `graph` are sorted, non-empty and non-overlapping
//! - Leading frontmatter is always its own block
//! - Identical input always yields identical ranges

pub mod graph;
pub mod kinds;
pub mod semantics;
pub mod tokenizer;
pub mod types;

pub use graph::{build_block_ranges, normalize_ranges};
pub use kinds::Frontmatter;
pub use semantics::{
    build_block_attrs, classify_block_source, extract_frontmatter_range,
    extract_leading_frontmatter,
};
pub use tokenizer::{BlockToken, BlockTokenizer, PulldownTokenizer, TreeSitterTokenizer};
pub use types::{BlockAttrs, BlockType};
