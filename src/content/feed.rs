//! Feed configuration, errors and ordering

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use super::markdown::DEFAULT_WORDS_PER_MINUTE;
use super::Entry;

/// Builds the link for an entry from its slug
pub type HrefForSlug = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Errors surfaced by feed lookups
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("unknown content category: {0}")]
    UnknownCategory(String),

    #[error("no {category} entry named {slug:?}")]
    NotFound { category: String, slug: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FeedError {
    /// Whether the error means "there is no such thing" rather than a fault
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FeedError::NotFound { .. } | FeedError::UnknownCategory(_)
        )
    }
}

/// Where one category's entries live and how they link
#[derive(Clone)]
pub struct FeedConfig {
    pub category: String,
    /// Directories scanned, in order
    pub dirs: Vec<PathBuf>,
    /// File extensions (without the dot) treated as entries
    pub extensions: Vec<String>,
    pub words_per_minute: usize,
    href_for_slug: HrefForSlug,
}

impl FeedConfig {
    pub fn new<F>(category: &str, dirs: Vec<PathBuf>, href_for_slug: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            category: category.to_string(),
            dirs,
            extensions: vec!["md".to_string(), "mdx".to_string(), "markdown".to_string()],
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            href_for_slug: Arc::new(href_for_slug),
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_words_per_minute(mut self, words_per_minute: usize) -> Self {
        self.words_per_minute = words_per_minute;
        self
    }

    /// Link for one slug
    pub fn href_for(&self, slug: &str) -> String {
        (self.href_for_slug)(slug)
    }

    /// Whether a file extension belongs to this feed
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    }
}

impl fmt::Debug for FeedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedConfig")
            .field("category", &self.category)
            .field("dirs", &self.dirs)
            .field("extensions", &self.extensions)
            .field("words_per_minute", &self.words_per_minute)
            .finish_non_exhaustive()
    }
}

/// Sort entries into feed order
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(Entry::feed_order);
}
