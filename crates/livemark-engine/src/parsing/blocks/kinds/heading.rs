/// ATX heading delimiter knowledge.
pub struct Heading;

impl Heading {
    pub const MARKER: char = '#';
    pub const MAX_LEVEL: u8 = 6;
    /// Leading indentation tolerated before the marker run.
    pub const MAX_INDENT: usize = 3;

    /// Heading level of `line`, if it opens an ATX heading.
    ///
    /// The marker run must be 1..=6 characters and be followed by whitespace.
    pub fn level(line: &str) -> Option<u8> {
        let indent = line.chars().take_while(|c| c.is_whitespace()).count();
        if indent > Self::MAX_INDENT {
            return None;
        }
        let rest = line.trim_start();
        let run = rest.chars().take_while(|&c| c == Self::MARKER).count();
        if run == 0 || run > Self::MAX_LEVEL as usize {
            return None;
        }
        match rest[run..].chars().next() {
            Some(c) if c.is_whitespace() => Some(run as u8),
            _ => None,
        }
    }
}
