//! # Position Mapping
//!
//! - **`position`**: `PositionMapper`, mapping pre-edit offsets through an edit
//! - **`source_map`**: `SourceMapIndex`, resolving source offsets to blocks and rendered fragments

pub mod position;
pub mod source_map;

pub use position::{Assoc, IdentityMapper, MapError, PositionMapper, map_or_clamp};
pub use source_map::{
    ClampedPosition, EntryKind, RenderedFragment, SourceMapContext, SourceMapEntry,
    SourceMapIndex, SourceMapInput,
};
