/// A byte cursor over one block's text.
///
/// Positions reported by [`Cursor::pos`] are absolute document offsets
/// (`base` + local index). Detectors only ever match ASCII delimiters, so
/// stepping byte-wise never splits a match inside a multi-byte char.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The block text being scanned.
    pub s: &'a str,
    /// Document offset of `s[0]`.
    pub base: usize,
    /// Current local index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str, base: usize) -> Self {
        Self { s, base, i: 0 }
    }

    /// Current absolute byte position.
    pub fn pos(&self) -> usize {
        self.base + self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    /// Byte `n` positions ahead of the cursor.
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.s.as_bytes().get(self.i + n).copied()
    }

    /// The byte just before the cursor; `None` at the start of the text.
    pub fn prev(&self) -> Option<u8> {
        self.i
            .checked_sub(1)
            .and_then(|j| self.s.as_bytes().get(j).copied())
    }

    pub fn starts_with(&self, pat: &[u8]) -> bool {
        self.s
            .as_bytes()
            .get(self.i..)
            .is_some_and(|rest| rest.starts_with(pat))
    }

    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.i += 1;
        Some(b)
    }

    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }

    /// Consumes bytes while `keep` holds, returning how many were consumed.
    pub fn eat_while(&mut self, keep: impl Fn(u8) -> bool) -> usize {
        let start = self.i;
        while let Some(b) = self.peek() {
            if !keep(b) {
                break;
            }
            self.i += 1;
        }
        self.i - start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cur = Cursor::new("hello", 10);
        assert_eq!(cur.pos(), 10);
        assert!(!cur.eof());
        assert_eq!(cur.peek(), Some(b'h'));
        assert_eq!(cur.bump(), Some(b'h'));
        assert_eq!(cur.pos(), 11);
        assert_eq!(cur.prev(), Some(b'h'));
    }

    #[test]
    fn prev_at_start_is_none() {
        let cur = Cursor::new("abc", 0);
        assert_eq!(cur.prev(), None);
        assert_eq!(cur.peek_at(2), Some(b'c'));
        assert_eq!(cur.peek_at(3), None);
    }

    #[test]
    fn starts_with_past_end() {
        let mut cur = Cursor::new("ab", 0);
        assert!(!cur.starts_with(b"abc"));
        cur.bump_n(10);
        assert!(cur.eof());
        assert!(!cur.starts_with(b""));
        assert_eq!(cur.peek(), None);
    }

    #[test]
    fn eat_while_counts_bytes() {
        let mut cur = Cursor::new("aaab", 0);
        assert_eq!(cur.eat_while(|b| b == b'a'), 3);
        assert_eq!(cur.peek(), Some(b'b'));
        assert_eq!(cur.eat_while(|b| b == b'a'), 0);
    }

    #[test]
    fn bump_at_eof_returns_none() {
        let mut cur = Cursor::new("x", 0);
        assert_eq!(cur.bump(), Some(b'x'));
        assert_eq!(cur.bump(), None);
        assert_eq!(cur.bump(), None);
    }
}
