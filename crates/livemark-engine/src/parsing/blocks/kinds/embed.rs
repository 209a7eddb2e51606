use std::sync::OnceLock;

use regex::Regex;

/// A block consisting of nothing but a single `[[target]]` or `![[target]]`.
pub struct EmbedLine;

impl EmbedLine {
    pub const EMBED_BANG: char = '!';

    fn pattern() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r"^!?\[\[[^\[\]\n]+(?:\|[^\[\]\n]+)?\]\]$").expect("valid wikilink regex")
        })
    }

    /// `![[note]]` on its own.
    pub fn is_embed(trimmed: &str) -> bool {
        trimmed.starts_with(Self::EMBED_BANG) && Self::pattern().is_match(trimmed)
    }

    /// `[[note]]` or `[[note|alias]]` on its own.
    pub fn is_wikilink(trimmed: &str) -> bool {
        !trimmed.starts_with(Self::EMBED_BANG) && Self::pattern().is_match(trimmed)
    }
}
