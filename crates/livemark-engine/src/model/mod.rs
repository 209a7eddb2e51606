//! # Document Model
//!
//! Immutable snapshots of a parsed document and the comparison between two
//! of them.
//!
//! - **`change`**: `ChangeSpan`/`ChangeRange`, one edit region in old and new coordinates
//! - **`doc_model`**: `DocModel`, `Block`, `BlockId`, `ModelMeta`
//! - **`block_graph`**: `BlockNode`, the linked-list view of a model's blocks
//! - **`diff`**: `ModelDiff` and `diff_doc_models`

pub mod block_graph;
pub mod change;
pub mod diff;
pub mod doc_model;

pub use block_graph::BlockNode;
pub use change::{ChangeRange, ChangeSpan};
pub use diff::{ModelDiff, diff_doc_models};
pub use doc_model::{Block, BlockId, DocModel, ModelMeta};
