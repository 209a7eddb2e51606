pub mod editing;
pub mod mapping;
pub mod model;
pub mod parsing;

// Re-export key types for easier usage
pub use editing::{
    DeltaTransaction, DocumentSession, EditTransaction, SessionOptions, SessionUpdate,
    SpanTransaction,
};
pub use mapping::{Assoc, PositionMapper, RenderedFragment, SourceMapIndex, SourceMapInput};
pub use model::{Block, BlockId, DocModel, ModelDiff, diff_doc_models};
pub use parsing::blocks::{BlockAttrs, BlockType};
pub use parsing::inline::{InlineKind, InlineSpan};
pub use parsing::text::Span;
pub use parsing::{IncrementalMarkdownParser, MarkdownParser, ParseReason, ParserKind, ParserOptions};
