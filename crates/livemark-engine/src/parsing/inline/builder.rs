use crate::parsing::text::{Span, floor_char_boundary, slice};

use super::{
    cursor::Cursor,
    kinds::{CodeSpan, Emphasis, Link, Strong, WikiLink},
    types::{InlineKind, InlineSpan},
};

/// A detector hit: the full source range it claims and the spans it emits.
struct Detected {
    full: Span,
    spans: Vec<InlineSpan>,
}

type Detector = fn(&mut Cursor<'_>) -> Option<Detected>;

/// Builds inline spans for every block of `text`, sorted by `(from, to)`.
///
/// Detectors run per block in priority order: wikilinks and embeds, inline
/// code, links, strong, emphasis. A match whose full range touches a range
/// already claimed by an earlier detector is dropped, so `**[[x]]**` yields
/// only the wikilink.
pub fn build_inline_spans(text: &str, blocks: &[Span]) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    for block in blocks {
        let from = floor_char_boundary(text, block.start);
        let source = slice(text, *block);
        if source.is_empty() {
            continue;
        }
        spans.extend(build_block_spans(source, from));
    }
    spans.sort_by_key(|s| (s.from, s.to));
    spans
}

/// Inline spans for a single block whose text starts at document offset `base`.
pub fn build_block_spans(source: &str, base: usize) -> Vec<InlineSpan> {
    let detectors: [Detector; 7] = [
        try_parse_wikilink,
        try_parse_code_span,
        try_parse_link,
        |cur| try_parse_strong(cur, Strong::MARKERS[0]),
        |cur| try_parse_strong(cur, Strong::MARKERS[1]),
        |cur| try_parse_emphasis(cur, Emphasis::MARKERS[0]),
        |cur| try_parse_emphasis(cur, Emphasis::MARKERS[1]),
    ];

    let mut spans = Vec::new();
    let mut blocked: Vec<Span> = Vec::new();
    for detect in detectors {
        let mut cur = Cursor::new(source, base);
        while !cur.eof() {
            let Some(hit) = detect(&mut cur) else {
                cur.bump();
                continue;
            };
            if blocked.iter().any(|b| b.overlaps(hit.full)) {
                continue;
            }
            blocked.push(hit.full);
            spans.extend(hit.spans.into_iter().filter(|s| s.to > s.from));
        }
    }
    spans.sort_by_key(|s| (s.from, s.to));
    spans
}

/// `[[target]]`, `[[target|alias]]`, or the same prefixed with `!`.
fn try_parse_wikilink(cur: &mut Cursor<'_>) -> Option<Detected> {
    let embed = cur.peek() == Some(WikiLink::EMBED);
    let open_at = usize::from(embed);
    if !(embed || cur.starts_with(WikiLink::OPEN)) {
        return None;
    }

    let saved = cur.clone();
    let start = cur.pos();
    cur.bump_n(open_at);
    if !cur.starts_with(WikiLink::OPEN) {
        *cur = saved;
        return None;
    }
    cur.bump_n(WikiLink::OPEN.len());

    let target_start = cur.pos();
    if cur.eat_while(WikiLink::is_target_byte) == 0 {
        *cur = saved;
        return None;
    }
    let target = Span::new(target_start, cur.pos());

    let mut alias = None;
    if cur.peek() == Some(WikiLink::ALIAS) {
        let before_alias = cur.clone();
        cur.bump();
        let alias_start = cur.pos();
        if cur.eat_while(WikiLink::is_alias_byte) > 0 && cur.starts_with(WikiLink::CLOSE) {
            alias = Some(Span::new(alias_start, cur.pos()));
        } else {
            *cur = before_alias;
        }
    }

    if !cur.starts_with(WikiLink::CLOSE) {
        *cur = saved;
        return None;
    }
    cur.bump_n(WikiLink::CLOSE.len());
    let full = Span::new(start, cur.pos());

    let (whole, target_kind, alias_kind) = if embed {
        (InlineKind::Embed, InlineKind::EmbedTarget, InlineKind::EmbedAlias)
    } else {
        (
            InlineKind::Wikilink,
            InlineKind::WikilinkTarget,
            InlineKind::WikilinkAlias,
        )
    };
    let mut spans = vec![InlineSpan::new(target, target_kind)];
    if let Some(alias) = alias {
        spans.push(InlineSpan::new(alias, alias_kind));
    }
    spans.push(InlineSpan::new(full, whole));
    Some(Detected { full, spans })
}

/// `` `code` `` on a single line.
fn try_parse_code_span(cur: &mut Cursor<'_>) -> Option<Detected> {
    if cur.peek() != Some(CodeSpan::TICK) {
        return None;
    }

    let saved = cur.clone();
    let start = cur.pos();
    cur.bump();
    let inner_start = cur.pos();
    let inner_len = cur.eat_while(|b| b != CodeSpan::TICK && b != b'\n');
    if inner_len == 0 || cur.peek() != Some(CodeSpan::TICK) {
        *cur = saved;
        return None;
    }
    let inner = Span::new(inner_start, cur.pos());
    cur.bump();

    Some(Detected {
        full: Span::new(start, cur.pos()),
        spans: vec![InlineSpan::new(inner, InlineKind::InlineCode)],
    })
}

/// `[label](url)`.
fn try_parse_link(cur: &mut Cursor<'_>) -> Option<Detected> {
    if cur.peek() != Some(Link::LABEL_OPEN) {
        return None;
    }

    let saved = cur.clone();
    let start = cur.pos();
    cur.bump();
    let label_start = cur.pos();
    if cur.eat_while(|b| b != Link::LABEL_CLOSE && b != b'\n') == 0
        || cur.peek() != Some(Link::LABEL_CLOSE)
        || cur.peek_at(1) != Some(Link::URL_OPEN)
    {
        *cur = saved;
        return None;
    }
    let label = Span::new(label_start, cur.pos());
    cur.bump_n(2);

    let url_start = cur.pos();
    if cur.eat_while(|b| b != Link::URL_CLOSE && b != b'\n') == 0
        || cur.peek() != Some(Link::URL_CLOSE)
    {
        *cur = saved;
        return None;
    }
    let url = Span::new(url_start, cur.pos());
    cur.bump();

    Some(Detected {
        full: Span::new(start, cur.pos()),
        spans: vec![
            InlineSpan::new(label, InlineKind::LinkLabel),
            InlineSpan::new(url, InlineKind::LinkUrl),
        ],
    })
}

/// `**strong**` or `__strong__`, selected by `marker`.
fn try_parse_strong(cur: &mut Cursor<'_>, marker: &[u8; 2]) -> Option<Detected> {
    if !cur.starts_with(marker) {
        return None;
    }

    let saved = cur.clone();
    let start = cur.pos();
    cur.bump_n(marker.len());
    let inner_start = cur.pos();
    if cur.eat_while(|b| b != marker[0] && b != b'\n') == 0 || !cur.starts_with(marker) {
        *cur = saved;
        return None;
    }
    let inner = Span::new(inner_start, cur.pos());
    cur.bump_n(marker.len());

    Some(Detected {
        full: Span::new(start, cur.pos()),
        spans: vec![InlineSpan::new(inner, InlineKind::Strong)],
    })
}

/// `*emphasis*` or `_emphasis_`. Neither delimiter may touch another copy of
/// the marker on its outer side, which keeps `**strong**` out.
fn try_parse_emphasis(cur: &mut Cursor<'_>, marker: u8) -> Option<Detected> {
    if cur.peek() != Some(marker) || cur.prev() == Some(marker) {
        return None;
    }

    let saved = cur.clone();
    let start = cur.pos();
    cur.bump();
    let inner_start = cur.pos();
    if cur.eat_while(|b| b != marker && b != b'\n') == 0
        || cur.peek() != Some(marker)
        || cur.peek_at(1) == Some(marker)
    {
        *cur = saved;
        return None;
    }
    let inner = Span::new(inner_start, cur.pos());
    cur.bump();

    Some(Detected {
        full: Span::new(start, cur.pos()),
        spans: vec![InlineSpan::new(inner, InlineKind::Emphasis)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds_and_text<'a>(text: &'a str, spans: &[InlineSpan]) -> Vec<(&'static str, &'a str)> {
        spans
            .iter()
            .map(|s| (s.kind.as_str(), &text[s.from..s.to]))
            .collect()
    }

    fn one_block(text: &str) -> Vec<(&'static str, &str)> {
        let spans = build_inline_spans(text, &[Span::new(0, text.len())]);
        kinds_and_text(text, &spans)
    }

    #[test]
    fn plain_text_has_no_spans() {
        assert_eq!(one_block("hello world"), vec![]);
    }

    #[test]
    fn wikilink_with_alias() {
        assert_eq!(
            one_block("see [[Target|shown]] here"),
            vec![
                ("wikilink", "[[Target|shown]]"),
                ("wikilink-target", "Target"),
                ("wikilink-alias", "shown"),
            ]
        );
    }

    #[test]
    fn embed_target_skips_bang() {
        assert_eq!(
            one_block("![[img.png]]"),
            vec![("embed", "![[img.png]]"), ("embed-target", "img.png")]
        );
    }

    #[test]
    fn empty_alias_fails_the_whole_link() {
        assert_eq!(one_block("[[Target|]]"), vec![]);
    }

    #[test]
    fn inline_code_inner_range() {
        assert_eq!(one_block("run `cargo` now"), vec![("inline-code", "cargo")]);
    }

    #[test]
    fn code_suppresses_later_detectors() {
        assert_eq!(one_block("`**not strong**`"), vec![("inline-code", "**not strong**")]);
    }

    #[test]
    fn wikilink_outranks_code() {
        assert_eq!(
            one_block("`[[note]]`"),
            vec![("wikilink", "[[note]]"), ("wikilink-target", "note")]
        );
    }

    #[test]
    fn link_label_and_url() {
        assert_eq!(
            one_block("a [docs](https://x.io) b"),
            vec![("link-label", "docs"), ("link-url", "https://x.io")]
        );
    }

    #[test]
    fn strong_wrapping_wikilink_is_not_double_tagged() {
        assert_eq!(
            one_block("**[[link]]**"),
            vec![("wikilink", "[[link]]"), ("wikilink-target", "link")]
        );
    }

    #[test]
    fn strong_and_emphasis() {
        assert_eq!(
            one_block("**bold** and *it* and __b2__ and _i2_"),
            vec![
                ("strong", "bold"),
                ("emphasis", "it"),
                ("strong", "b2"),
                ("emphasis", "i2"),
            ]
        );
    }

    #[test]
    fn emphasis_does_not_cross_lines() {
        assert_eq!(one_block("*open\nclose*"), vec![]);
    }

    #[test]
    fn spans_are_absolute_and_sorted_across_blocks() {
        let text = "*a*\n\n`b`\n";
        let spans = build_inline_spans(text, &[Span::new(5, 9), Span::new(0, 4)]);
        assert_eq!(
            spans,
            vec![
                InlineSpan {
                    from: 1,
                    to: 2,
                    kind: InlineKind::Emphasis
                },
                InlineSpan {
                    from: 6,
                    to: 7,
                    kind: InlineKind::InlineCode
                },
            ]
        );
    }

    #[test]
    fn multibyte_text_keeps_byte_offsets() {
        let text = "héllo **wörld**";
        assert_eq!(one_block(text), vec![("strong", "wörld")]);
    }
}
