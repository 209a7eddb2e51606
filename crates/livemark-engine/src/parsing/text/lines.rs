/// Precomputed line-start offsets for a piece of text.
///
/// The table always starts with `0`; when the text does not end in a newline
/// the text length is appended, so `starts.len() - 1` is the number of lines
/// a tokenizer line map can address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        if starts.last().copied() != Some(text.len()) {
            starts.push(text.len());
        }
        Self {
            starts,
            len: text.len(),
        }
    }

    /// Number of addressable lines (at least 1).
    pub fn line_count(&self) -> usize {
        self.starts.len().saturating_sub(1).max(1)
    }

    /// Byte offset where 0-based `line` starts, clamped to the text end.
    pub fn line_start(&self, line: usize) -> usize {
        if line == 0 {
            return 0;
        }
        if line >= self.line_count() {
            return self.starts.last().copied().unwrap_or(self.len);
        }
        self.starts[line]
    }

    /// 1-based line number containing byte offset `pos`.
    pub fn line_of_offset(&self, pos: usize) -> usize {
        match self.starts.binary_search(&pos) {
            Ok(idx) => idx + 1,
            Err(idx) => idx.max(1),
        }
    }
}
