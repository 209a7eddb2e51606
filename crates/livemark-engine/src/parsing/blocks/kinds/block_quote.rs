/// Blockquote delimiter knowledge.
pub struct BlockQuote;

impl BlockQuote {
    /// The blockquote prefix character.
    pub const PREFIX: char = '>';

    /// True when the first line opens a quote (`>` after optional whitespace).
    pub fn opens(text: &str) -> bool {
        text.trim_start().starts_with(Self::PREFIX)
    }

    /// Strips blockquote prefixes from a line, returning (depth, byte_offset).
    ///
    /// Handles `> text`, `>> nested` and `> > spaced nested`.
    pub fn strip_prefixes(s: &str) -> (u8, usize) {
        let b = s.as_bytes();
        let mut i = 0usize;
        let mut depth = 0u8;

        while i < b.len() {
            let start = i;
            while i < b.len() && b[i].is_ascii_whitespace() && b[i] != b'\n' {
                i += 1;
            }
            if i < b.len() && b[i] == Self::PREFIX as u8 {
                depth = depth.saturating_add(1);
                i += 1;
                if i < b.len() && b[i] == b' ' {
                    i += 1;
                }
            } else {
                i = start;
                break;
            }
        }
        (depth, i)
    }
}
