/// Thematic break (`---`, `* * *`, `___`) knowledge.
pub struct ThematicBreak;

impl ThematicBreak {
    pub const CHARS: [char; 3] = ['-', '*', '_'];
    pub const MIN_COUNT: usize = 3;

    /// True when `text` is three or more of the same break character,
    /// optionally separated by whitespace.
    pub fn matches(text: &str) -> bool {
        let mut marks = text.chars().filter(|c| !c.is_whitespace());
        let Some(first) = marks.next() else {
            return false;
        };
        if !Self::CHARS.contains(&first) {
            return false;
        }
        let mut count = 1;
        for c in marks {
            if c != first {
                return false;
            }
            count += 1;
        }
        count >= Self::MIN_COUNT
    }
}
