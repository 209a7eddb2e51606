/*!
 * # Editing
 *
 * Turns host editor transactions into committed document models.
 *
 * ## Flow
 *
 * 1. [`transaction::classify`] reads the change regions of an [`EditTransaction`]
 * 2. [`DocumentSession`] rebuilds the post-edit text and asks the parser for
 *    a windowed re-parse, falling back to a full parse when it must
 * 3. [`identity::assign_stable_ids`] carries block ids over from the previous model
 * 4. The new [`DocModel`](crate::model::DocModel) is diffed against the old one and becomes current
 *
 * ## Modules
 *
 * - **`transaction`**: `EditTransaction` trait, classification, `DeltaTransaction` (xi-rope) and `SpanTransaction`
 * - **`identity`**: stable block-id assignment
 * - **`session`**: `DocumentSession`, the owner of the current model
 *
 * ## Usage Pattern
 *
 * ```rust
 * use livemark_engine::editing::{DeltaTransaction, DocumentSession};
 *
 * let text = "# Title\n\nParagraph one.\n";
 * let mut session = DocumentSession::new();
 * session.set_text(text);
 * let first_id = session.blocks()[1].id.clone();
 *
 * let tx = DeltaTransaction::from_edits(text, &[(19..22, "ONE")]);
 * let update = session.apply_transaction(&tx);
 * assert_eq!(update.model.text(), "# Title\n\nParagraph ONE.\n");
 * assert_eq!(session.blocks()[1].id, first_id);
 * ```
 */

pub mod identity;
pub mod session;
pub mod transaction;

pub use identity::{DEFAULT_MIN_COVERAGE, assign_stable_ids};
pub use session::{DocumentSession, SessionOptions, SessionUpdate};
pub use transaction::{
    DeltaTransaction, EditTransaction, Selection, SpanTransaction, TransactionClassification,
    apply_change_spans_to_text, classify, map_through_spans,
};
