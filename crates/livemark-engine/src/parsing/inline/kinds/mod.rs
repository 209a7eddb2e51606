//! # Inline Kinds
//!
//! Inline constructs that own their syntax delimiters. Detectors in
//! `builder` read these constants and never hardcode `[[`, `` ` `` or `*`.

pub mod code_span;
pub mod emphasis;
pub mod link;
pub mod wikilink;

pub use code_span::CodeSpan;
pub use emphasis::{Emphasis, Strong};
pub use link::Link;
pub use wikilink::WikiLink;
