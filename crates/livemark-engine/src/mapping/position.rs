use thiserror::Error;

/// Which side of an insertion a mapped position sticks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Assoc {
    /// Stay before text inserted at the position.
    Before,
    /// Move after text inserted at the position.
    After,
}

impl Assoc {
    pub fn is_after(self) -> bool {
        matches!(self, Assoc::After)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("position {pos} is outside the pre-edit document (length {len})")]
    OutOfRange { pos: usize, len: usize },
    #[error("position mapping failed: {0}")]
    Failed(String),
}

/// Maps pre-edit offsets to post-edit offsets.
///
/// Implementations must be side-effect free; they may be called many times
/// per parse.
pub trait PositionMapper {
    fn map_pos(&self, pos: usize, assoc: Assoc) -> Result<usize, MapError>;
}

/// Maps every position to itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityMapper;

impl PositionMapper for IdentityMapper {
    fn map_pos(&self, pos: usize, _assoc: Assoc) -> Result<usize, MapError> {
        Ok(pos)
    }
}

impl<F> PositionMapper for F
where
    F: Fn(usize, Assoc) -> Result<usize, MapError>,
{
    fn map_pos(&self, pos: usize, assoc: Assoc) -> Result<usize, MapError> {
        self(pos, assoc)
    }
}

/// Maps `pos`, falling back to `fallback` when the mapper fails, and clamps
/// the result to `[0, max]`.
pub fn map_or_clamp(
    mapper: &dyn PositionMapper,
    pos: usize,
    assoc: Assoc,
    fallback: usize,
    max: usize,
) -> usize {
    match mapper.map_pos(pos, assoc) {
        Ok(mapped) => mapped.min(max),
        Err(e) => {
            log::debug!("position {pos} unmapped ({e}); keeping {fallback}");
            fallback.min(max)
        }
    }
}
