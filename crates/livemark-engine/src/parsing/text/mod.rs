pub mod lines;
pub mod slice;
pub mod span;

pub use lines::LineIndex;
pub use slice::{floor_char_boundary, preview, slice};
pub use span::Span;
