use crate::model::DocModel;
use crate::parsing::ParseResult;

/// Validates parser output invariants.
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(text: &str, result: &ParseResult) {
    let n = text.len();
    for pair in result.blocks.windows(2) {
        assert!(
            pair[0].end <= pair[1].start,
            "blocks overlap or are unsorted: {:?} then {:?}",
            pair[0],
            pair[1]
        );
    }
    for b in &result.blocks {
        assert!(
            b.start < b.end && b.end <= n,
            "block span out of bounds: {b:?} (text len: {n})"
        );
    }
    for s in &result.inline_spans {
        assert!(
            s.from < s.to && s.to <= n,
            "inline span out of bounds: {s:?} (text len: {n})"
        );
    }
    assert!(
        result
            .inline_spans
            .windows(2)
            .all(|w| (w[0].from, w[0].to) <= (w[1].from, w[1].to)),
        "inline spans unsorted"
    );
}

/// Validates a committed model: block invariants, unique ids and a block
/// graph that mirrors the block list.
pub fn check_model(model: &DocModel) {
    let blocks = model.blocks();
    let mut ids = std::collections::HashSet::new();
    for (i, b) in blocks.iter().enumerate() {
        assert!(b.from < b.to && b.to <= model.len(), "block {i} out of bounds");
        assert!(ids.insert(b.id.clone()), "duplicate block id {}", b.id);
        assert!(b.line_from <= b.line_to, "block {i} line range inverted");
    }
    for pair in blocks.windows(2) {
        assert!(pair[0].to <= pair[1].from, "blocks overlap");
    }

    let graph = model.block_graph();
    assert_eq!(graph.len(), blocks.len(), "graph size mismatch");
    for (i, node) in graph.iter().enumerate() {
        assert_eq!(node.index, i);
        assert_eq!(node.id, blocks[i].id);
        assert_eq!(
            node.previous_id.as_ref(),
            i.checked_sub(1).map(|p| &blocks[p].id)
        );
        assert_eq!(node.next_id.as_ref(), blocks.get(i + 1).map(|b| &b.id));
    }
}
