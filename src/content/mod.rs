//! Content module - front-matter, markdown and feed assembly

mod entry;
mod feed;
mod frontmatter;
pub mod loader;
pub mod markdown;

pub use entry::{Entry, EntryDate};
pub use feed::{sort_entries, FeedConfig, FeedError, HrefForSlug};
pub use frontmatter::{strip_quotes, FieldValue, FrontMatter};
pub use loader::FeedLoader;
pub use markdown::MarkdownRenderer;
