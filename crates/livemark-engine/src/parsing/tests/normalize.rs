use crate::parsing::ParseResult;
use crate::parsing::blocks::classify_block_source;
use crate::parsing::text::{Span, slice};

/// Renders a parse result as one line per block, with its inline spans
/// indented underneath, for inline `insta` snapshots.
pub fn normalize(text: &str, result: &ParseResult) -> String {
    let mut out = String::new();
    for (i, b) in result.blocks.iter().enumerate() {
        let source = slice(text, *b);
        let kind = classify_block_source(source, i == 0);
        out.push_str(&format!(
            "{kind} {}..{} {}\n",
            b.start,
            b.end,
            source.escape_debug()
        ));
        for s in result
            .inline_spans
            .iter()
            .filter(|s| s.from >= b.start && s.to <= b.end)
        {
            out.push_str(&format!(
                "  {} {}..{} {}\n",
                s.kind,
                s.from,
                s.to,
                slice(text, Span::new(s.from, s.to)).escape_debug()
            ));
        }
    }
    out
}
