use serde::Serialize;

use crate::parsing::text::Span;

/// What an inline span marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InlineKind {
    /// Whole `[[target|alias]]`, delimiters included.
    Wikilink,
    WikilinkTarget,
    WikilinkAlias,
    /// Whole `![[target|alias]]`, delimiters included.
    Embed,
    EmbedTarget,
    EmbedAlias,
    /// Text between the backticks.
    InlineCode,
    LinkLabel,
    LinkUrl,
    /// Text between `**`/`__`.
    Strong,
    /// Text between `*`/`_`.
    Emphasis,
}

impl InlineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InlineKind::Wikilink => "wikilink",
            InlineKind::WikilinkTarget => "wikilink-target",
            InlineKind::WikilinkAlias => "wikilink-alias",
            InlineKind::Embed => "embed",
            InlineKind::EmbedTarget => "embed-target",
            InlineKind::EmbedAlias => "embed-alias",
            InlineKind::InlineCode => "inline-code",
            InlineKind::LinkLabel => "link-label",
            InlineKind::LinkUrl => "link-url",
            InlineKind::Strong => "strong",
            InlineKind::Emphasis => "emphasis",
        }
    }
}

impl std::fmt::Display for InlineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inline construct at absolute document offsets `[from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct InlineSpan {
    pub from: usize,
    pub to: usize,
    pub kind: InlineKind,
}

impl InlineSpan {
    pub fn new(sp: Span, kind: InlineKind) -> Self {
        Self {
            from: sp.start,
            to: sp.end,
            kind,
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.from, self.to)
    }
}
