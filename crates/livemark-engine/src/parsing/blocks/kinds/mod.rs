pub mod block_quote;
pub mod code_fence;
pub mod embed;
pub mod frontmatter;
pub mod heading;
pub mod list_item;
pub mod table;
pub mod thematic_break;

pub use block_quote::BlockQuote;
pub use code_fence::CodeFence;
pub use embed::EmbedLine;
pub use frontmatter::Frontmatter;
pub use heading::Heading;
pub use list_item::{ListItem, ListMarker};
pub use table::Table;
pub use thematic_break::ThematicBreak;
