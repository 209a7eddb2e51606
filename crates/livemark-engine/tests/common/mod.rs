// Shared helpers for integration tests; not every test file uses every helper.
#![allow(dead_code)]

use std::collections::HashSet;

use livemark_engine::parsing::ParseResult;
use livemark_engine::{DeltaTransaction, DocModel};

pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}.md",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

/// Replaces the first occurrence of `needle`.
pub fn replace_first(text: &str, needle: &str, replacement: &str) -> DeltaTransaction {
    let at = text
        .find(needle)
        .unwrap_or_else(|| panic!("{needle:?} not in text"));
    DeltaTransaction::from_edits(text, &[(at..at + needle.len(), replacement)])
}

pub fn assert_model_invariants(model: &DocModel) {
    let blocks = model.blocks();
    let mut ids = HashSet::new();
    for b in blocks {
        assert!(b.from < b.to && b.to <= model.len(), "block out of bounds: {b:?}");
        assert!(ids.insert(b.id.clone()), "duplicate id {}", b.id);
    }
    for pair in blocks.windows(2) {
        assert!(pair[0].to <= pair[1].from, "blocks overlap: {:?}", pair);
    }
    assert_eq!(model.block_graph().len(), blocks.len());
    for s in model.inline_spans() {
        assert!(s.from < s.to && s.to <= model.len(), "inline span out of bounds: {s:?}");
    }
}

pub fn assert_matches_full_parse(model: &DocModel, full: &ParseResult) {
    let spans: Vec<_> = model.blocks().iter().map(|b| b.span()).collect();
    pretty_assertions::assert_eq!(spans, full.blocks, "blocks differ from a full parse");
    pretty_assertions::assert_eq!(
        model.inline_spans(),
        full.inline_spans.as_slice(),
        "inline spans differ from a full parse"
    );
}
