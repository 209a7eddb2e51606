use super::span::Span;

/// Snaps `pos` down to the nearest char boundary of `text`, clamped to its length.
pub fn floor_char_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// Slices `text` by a span without panicking on out-of-range or mid-char offsets.
pub fn slice(text: &str, sp: Span) -> &str {
    let start = floor_char_boundary(text, sp.start);
    let end = floor_char_boundary(text, sp.end).max(start);
    &text[start..end]
}

/// Extracts text for a span, truncating to `max` bytes with "..." suffix if needed.
///
/// Used for human-readable dumps.
pub fn preview(text: &str, sp: Span, max: usize) -> String {
    let s = slice(text, sp);
    if s.len() > max {
        let cut = floor_char_boundary(s, max);
        format!("{}...", &s[..cut])
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_short_text_unchanged() {
        assert_eq!(preview("hello", Span::new(0, 5), 10), "hello");
    }

    #[test]
    fn preview_exact_length_unchanged() {
        assert_eq!(preview("hello", Span::new(0, 5), 5), "hello");
    }

    #[test]
    fn preview_truncates_long_text() {
        assert_eq!(preview("hello world", Span::new(0, 11), 5), "hello...");
    }

    #[test]
    fn preview_truncates_to_zero() {
        assert_eq!(preview("hello", Span::new(0, 5), 0), "...");
    }

    #[test]
    fn slice_partial_span() {
        assert_eq!(slice("hello world", Span::new(6, 11)), "world");
    }

    #[test]
    fn slice_clamps_out_of_range() {
        assert_eq!(slice("hello", Span::new(3, 99)), "lo");
        assert_eq!(slice("hello", Span::new(99, 120)), "");
    }

    #[test]
    fn slice_snaps_to_char_boundaries() {
        // "é" is two bytes; offset 2 falls inside it.
        let text = "aé b";
        assert_eq!(slice(text, Span::new(0, 2)), "a");
        assert_eq!(floor_char_boundary(text, 2), 1);
    }
}
