/// Fenced code delimiter knowledge.
///
/// A block counts as fenced code when its trimmed source starts with a run of
/// at least [`CodeFence::MIN_RUN`] fence characters and ends with one. The two
/// runs may be the same run for a lone fence line.
pub struct CodeFence;

impl CodeFence {
    pub const BACKTICK: char = '`';
    pub const TILDE: char = '~';
    pub const MIN_RUN: usize = 3;

    fn is_fence_char(c: char) -> bool {
        c == Self::BACKTICK || c == Self::TILDE
    }

    /// Length of the fence run at the start of `s`, after leading whitespace.
    pub fn leading_run(s: &str) -> usize {
        s.trim_start()
            .chars()
            .take_while(|&c| Self::is_fence_char(c))
            .count()
    }

    /// Length of the fence run at the end of `s`, before trailing whitespace.
    pub fn trailing_run(s: &str) -> usize {
        s.trim_end()
            .chars()
            .rev()
            .take_while(|&c| Self::is_fence_char(c))
            .count()
    }

    /// True when `trimmed` both opens and closes with a fence run.
    pub fn encloses(trimmed: &str) -> bool {
        Self::leading_run(trimmed) >= Self::MIN_RUN && Self::trailing_run(trimmed) >= Self::MIN_RUN
    }
}
