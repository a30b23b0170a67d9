//! Markdown rendering
//!
//! A deliberately small dialect: headings, paragraphs, flat lists,
//! blockquotes, fenced code, rules, and inline code, links, strong and
//! emphasis. All text is HTML-escaped; the only tags in the output are the
//! ones the renderer writes itself.

mod block;
mod inline;

pub use block::{render, word_count};
pub use inline::render_inline;

/// Words per minute used when a caller has no preference
pub const DEFAULT_WORDS_PER_MINUTE: usize = 220;

/// Markdown renderer
#[derive(Debug, Clone, Copy)]
pub struct MarkdownRenderer {
    words_per_minute: usize,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self {
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
        }
    }

    /// Create with a custom reading speed
    pub fn with_words_per_minute(words_per_minute: usize) -> Self {
        Self {
            words_per_minute: words_per_minute.max(1),
        }
    }

    /// Render a markdown body to HTML
    pub fn render(&self, markdown: &str) -> String {
        render(markdown)
    }

    /// Render a single line of inline markdown
    pub fn render_inline(&self, line: &str) -> String {
        render_inline(line)
    }

    /// Estimated reading time in whole minutes, never less than one
    pub fn reading_minutes(&self, markdown: &str) -> u32 {
        let words = word_count(markdown) as f64;
        let minutes = (words / self.words_per_minute as f64).round() as u32;
        minutes.max(1)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}
