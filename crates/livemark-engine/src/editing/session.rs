use std::sync::Arc;

use log::debug;

use crate::mapping::position::{Assoc, MapError};
use crate::model::{Block, DocModel, ModelDiff, ModelMeta, diff_doc_models};
use crate::parsing::inline::InlineSpan;
use crate::parsing::{
    IncrementalMarkdownParser, IncrementalRequest, MarkdownParser, ParseReason, ParseResult,
};

use super::identity::{DEFAULT_MIN_COVERAGE, assign_stable_ids};
use super::transaction::{
    EditTransaction, TransactionClassification, apply_change_spans_to_text, classify,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    /// Coverage needed to carry a block id across an edit.
    pub min_coverage: f64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            min_coverage: DEFAULT_MIN_COVERAGE,
        }
    }
}

/// What a session call produced.
#[derive(Debug, Clone)]
pub struct SessionUpdate {
    pub model: Arc<DocModel>,
    /// `None` when nothing was committed.
    pub diff: Option<ModelDiff>,
    /// Set by [`DocumentSession::apply_transaction`].
    pub classification: Option<TransactionClassification>,
}

/// Owner of the current [`DocModel`].
///
/// Every change goes through [`DocumentSession::commit_model`], which swaps
/// in a whole new snapshot. Callers that hold an `Arc` of an older model keep
/// seeing it unchanged.
pub struct DocumentSession<P: MarkdownParser = IncrementalMarkdownParser> {
    parser: P,
    options: SessionOptions,
    model: Arc<DocModel>,
}

impl DocumentSession {
    /// Session with the default parser and options, holding the empty model.
    pub fn new() -> Self {
        Self::with_parser(IncrementalMarkdownParser::default(), SessionOptions::default())
    }
}

impl Default for DocumentSession {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: MarkdownParser> DocumentSession<P> {
    pub fn with_parser(parser: P, options: SessionOptions) -> Self {
        Self {
            parser,
            options,
            model: Arc::new(DocModel::empty()),
        }
    }

    pub fn model(&self) -> &Arc<DocModel> {
        &self.model
    }

    pub fn blocks(&self) -> &[Block] {
        self.model.blocks()
    }

    pub fn inline_spans(&self) -> &[InlineSpan] {
        self.model.inline_spans()
    }

    pub fn version(&self) -> u64 {
        self.model.version()
    }

    pub fn text(&self) -> &str {
        self.model.text()
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    /// Replaces the document with a full parse of `text`.
    pub fn set_text(&mut self, text: &str) -> SessionUpdate {
        let parsed = self.parser.parse_full(text, ParseReason::FullParse);
        self.commit_model(text.to_string(), parsed, ParseReason::SetText)
    }

    /// Like [`DocumentSession::set_text`], tagging both the parse and the
    /// commit with `reason`.
    pub fn set_text_with_reason(&mut self, text: &str, reason: ParseReason) -> SessionUpdate {
        let parsed = self.parser.parse_full(text, reason);
        self.commit_model(text.to_string(), parsed, reason)
    }

    /// Re-parses only when `text` differs from the current text.
    pub fn ensure_text(&mut self, text: &str) -> SessionUpdate {
        if text == self.model.text() {
            return SessionUpdate {
                model: Arc::clone(&self.model),
                diff: None,
                classification: None,
            };
        }
        self.set_text_with_reason(text, ParseReason::EnsureTextSync)
    }

    /// Applies one host editor transaction.
    ///
    /// Transactions that do not change the document leave the model alone.
    /// If the transaction starts from text other than the session's, the
    /// session first resyncs to that text.
    pub fn apply_transaction<T: EditTransaction + ?Sized>(&mut self, tx: &T) -> SessionUpdate {
        let classification = classify(tx);
        if !classification.doc_changed {
            return SessionUpdate {
                model: Arc::clone(&self.model),
                diff: None,
                classification: Some(classification),
            };
        }

        let start_text = tx.start_text();
        if start_text.as_ref() != self.model.text() {
            debug!(
                "transaction start text differs from session text (v{}); resyncing",
                self.model.version()
            );
            self.set_text_with_reason(&start_text, ParseReason::TransactionResyncStartState);
        }

        let next_text = if classification.change_spans.is_empty() {
            tx.end_text().into_owned()
        } else {
            apply_change_spans_to_text(self.model.text(), &classification.change_spans)
        };

        let mapper = |pos: usize, assoc: Assoc| -> Result<usize, MapError> { tx.map_pos(pos, assoc) };
        let incremental = self.parser.parse_incremental(IncrementalRequest {
            previous_model: Some(self.model.as_ref()),
            next_text: &next_text,
            change_ranges: &classification.change_ranges,
            mapper: &mapper,
        });
        let parsed = match incremental {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("incremental parse failed: {e}");
                self.parser
                    .parse_full(&next_text, ParseReason::IncrementalParseFailed)
            }
        };

        let reason = parsed.meta.reason;
        let mut update = self.commit_model(next_text, parsed, reason);
        update.classification = Some(classification);
        update
    }

    /// Builds the next model from a parse result and makes it current.
    ///
    /// Block ids are carried over from the current model where the ranges
    /// match; the new model's version is one past the current one.
    pub fn commit_model(&mut self, text: String, parsed: ParseResult, reason: ParseReason) -> SessionUpdate {
        let previous = Arc::clone(&self.model);
        let ids = assign_stable_ids(previous.blocks(), &parsed.blocks, self.options.min_coverage);
        let next = DocModel::build(
            previous.version() + 1,
            text,
            &parsed.blocks,
            &ids,
            parsed.inline_spans,
            ModelMeta::committed(parsed.meta, reason),
        );
        let diff = diff_doc_models(&previous, &next);
        debug!(
            "committed v{} ({} parse, {}): {} blocks, {} inline spans",
            next.version(),
            next.meta().parser,
            reason,
            next.blocks().len(),
            next.inline_spans().len()
        );

        self.model = Arc::new(next);
        SessionUpdate {
            model: Arc::clone(&self.model),
            diff: Some(diff),
            classification: None,
        }
    }
}
