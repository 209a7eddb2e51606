use std::sync::OnceLock;

use regex::Regex;

/// Pipe table delimiter knowledge.
pub struct Table;

impl Table {
    pub const PIPE: char = '|';

    fn delimiter_row() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r"^\s*\|?[\s:-]+\|[\s|:-]*$").expect("Invalid table delimiter regex")
        })
    }

    /// A header line containing a pipe followed by a `---|:--:` style row.
    pub fn looks_like(text: &str) -> bool {
        let mut lines = text.split('\n');
        match (lines.next(), lines.next()) {
            (Some(header), Some(delimiter)) => {
                header.contains(Self::PIPE) && Self::delimiter_row().is_match(delimiter.trim())
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_pipe_table() {
        assert!(Table::looks_like("| a | b |\n|---|:--|\n| 1 | 2 |"));
        assert!(Table::looks_like("a | b\n--- | ---"));
    }

    #[test]
    fn header_without_delimiter_row() {
        assert!(!Table::looks_like("| a | b |\n| 1 | 2 |"));
        assert!(!Table::looks_like("| a | b |"));
    }
}
