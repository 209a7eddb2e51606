use serde::Serialize;

/// The classified type of a top-level block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Frontmatter,
    Embed,
    Wikilink,
    Hr,
    Heading,
    Blockquote,
    Code,
    Task,
    List,
    Table,
    Paragraph,
}

impl BlockType {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Frontmatter => "frontmatter",
            BlockType::Embed => "embed",
            BlockType::Wikilink => "wikilink",
            BlockType::Hr => "hr",
            BlockType::Heading => "heading",
            BlockType::Blockquote => "blockquote",
            BlockType::Code => "code",
            BlockType::Task => "task",
            BlockType::List => "list",
            BlockType::Table => "table",
            BlockType::Paragraph => "paragraph",
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-type attributes read from a block's first line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct BlockAttrs {
    /// Heading level, 1..=6.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    /// Task checkbox state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    /// Set on frontmatter blocks.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fenced: bool,
}
