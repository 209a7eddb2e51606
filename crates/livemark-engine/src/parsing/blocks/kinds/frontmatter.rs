/// A leading `---` fenced metadata block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontmatter {
    /// Source from the opening fence through the closing fence and its newline.
    pub raw: String,
    /// Text between the fences, without the final newline.
    pub body: String,
    /// Byte length of `raw`.
    pub total_length: usize,
}

impl Frontmatter {
    pub const FENCE: &'static str = "---";
    const OPEN: &'static str = "---\n";
    const CLOSE: &'static str = "\n---";

    /// Extracts frontmatter anchored at offset 0.
    ///
    /// The closing fence is the first `\n---` followed by a newline or the end
    /// of the text, so a `---` later in the document body is never taken for
    /// an opening fence.
    pub fn extract(text: &str) -> Option<Self> {
        if !text.starts_with(Self::OPEN) {
            return None;
        }

        // The opening line's newline may double as the first byte of the close.
        let search_from = Self::OPEN.len() - 1;
        let mut cursor = search_from;
        let (closing_start, total_length) = loop {
            let found = text[cursor..].find(Self::CLOSE)? + cursor;
            let after = found + Self::CLOSE.len();
            match text.as_bytes().get(after) {
                None => break (found, after),
                Some(b'\n') => break (found, after + 1),
                Some(_) => cursor = found + 1,
            }
        };

        let raw = text[..total_length].to_string();
        let body_start = Self::OPEN.len().min(closing_start);
        let body = text[body_start..closing_start]
            .strip_suffix('\n')
            .unwrap_or(&text[body_start..closing_start])
            .to_string();

        Some(Self {
            raw,
            body,
            total_length,
        })
    }
}
