/// The marker that opens a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    /// `-`, `+` or `*`.
    Bullet(char),
    /// `1.`, `42.` and so on.
    Ordered,
}

/// List item and task delimiter knowledge.
pub struct ListItem;

impl ListItem {
    pub const BULLETS: [char; 3] = ['-', '+', '*'];
    pub const ORDERED_SUFFIX: char = '.';

    /// Parses the item marker, returning it with the byte offset just past
    /// the whitespace that must follow it.
    pub fn marker(line: &str) -> Option<(ListMarker, usize)> {
        let indent = line.len() - line.trim_start().len();
        let rest = &line[indent..];

        let (marker, marker_len) = match rest.chars().next()? {
            c if Self::BULLETS.contains(&c) => (ListMarker::Bullet(c), 1),
            c if c.is_ascii_digit() => {
                let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
                if rest[digits..].starts_with(Self::ORDERED_SUFFIX) {
                    (ListMarker::Ordered, digits + 1)
                } else {
                    return None;
                }
            }
            _ => return None,
        };

        let after = &rest[marker_len..];
        let gap = after.len() - after.trim_start().len();
        (gap > 0).then_some((marker, indent + marker_len + gap))
    }

    /// Checkbox state when `line` is a task item (`- [ ] todo`, `1. [x] done`).
    pub fn task_state(line: &str) -> Option<bool> {
        let (_, content) = Self::marker(line)?;
        let rest = &line[content..];
        let checked = match rest.get(..3)? {
            "[ ]" => false,
            "[x]" | "[X]" => true,
            _ => return None,
        };
        rest[3..]
            .starts_with(char::is_whitespace)
            .then_some(checked)
    }

    /// True when a checkbox anywhere in `line` is ticked.
    pub fn has_checked_box(line: &str) -> bool {
        line.contains("[x]") || line.contains("[X]")
    }
}
