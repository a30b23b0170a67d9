//! Content loader - assembles feed entries from content directories

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{Entry, EntryDate, FeedConfig, FeedError, FrontMatter, MarkdownRenderer};
use crate::helpers;

/// Loads one category's entries from its configured directories
///
/// Every call re-reads the directories; nothing is cached between calls.
/// Documents are parsed independently, so a loader can be shared across
/// threads.
#[derive(Debug, Clone)]
pub struct FeedLoader {
    config: FeedConfig,
    renderer: MarkdownRenderer,
}

impl FeedLoader {
    /// Create a new loader
    pub fn new(config: FeedConfig) -> Self {
        let renderer = MarkdownRenderer::with_words_per_minute(config.words_per_minute);
        Self { config, renderer }
    }

    /// All listable entries in feed order
    ///
    /// Missing directories and unreadable files contribute nothing.
    pub fn entries(&self) -> Vec<Entry> {
        let mut entries = Vec::new();

        for (slug, path) in self.files() {
            let entry = match self.load_file(&path) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping {:?}: {}", path, e);
                    continue;
                }
            };

            if !entry.is_listable() {
                tracing::debug!("Skipping {:?}: no usable title", path);
                continue;
            }

            tracing::trace!("Loaded {} from {:?}", slug, path);
            entries.push(entry);
        }

        super::sort_entries(&mut entries);
        tracing::debug!(
            "Loaded {} {} entries",
            entries.len(),
            self.config.category
        );
        entries
    }

    /// Look up one entry by slug
    ///
    /// Resolves the slug against the same files `entries` lists. Unknown
    /// slugs, path-like slugs and unreadable files are all reported as
    /// `NotFound`.
    pub fn entry(&self, slug: &str) -> Result<Entry, FeedError> {
        let not_found = || FeedError::NotFound {
            category: self.config.category.clone(),
            slug: slug.to_string(),
        };

        if !is_safe_slug(slug) {
            return Err(not_found());
        }

        let (_, path) = self
            .files()
            .into_iter()
            .find(|(candidate, _)| candidate == slug)
            .ok_or_else(not_found)?;

        self.load_file(&path).map_err(|e| {
            tracing::warn!("Failed to load {:?}: {}", path, e);
            not_found()
        })
    }

    /// Content files by slug, one per slug
    ///
    /// Directories are scanned in configured order and each directory by
    /// file name; the first file seen for a slug owns it.
    fn files(&self) -> Vec<(String, PathBuf)> {
        let mut files = Vec::new();
        let mut seen = HashSet::new();

        for dir in &self.config.dirs {
            if !dir.is_dir() {
                tracing::debug!("Content directory {:?} does not exist, skipping", dir);
                continue;
            }

            for item in WalkDir::new(dir)
                .min_depth(1)
                .max_depth(1)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = item.path();
                if !path.is_file() || !self.is_entry_file(path) {
                    continue;
                }
                let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                if !seen.insert(slug.to_string()) {
                    tracing::debug!("Skipping {:?}: slug {} already taken", path, slug);
                    continue;
                }
                files.push((slug.to_string(), path.to_path_buf()));
            }
        }

        files
    }

    /// Read and assemble a single file
    pub fn load_file(&self, path: &Path) -> Result<Entry, FeedError> {
        let document = fs::read_to_string(path).map_err(|source| FeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        Ok(self.build_entry(slug, &document))
    }

    /// Assemble an entry from a document's text
    pub fn build_entry(&self, slug: &str, document: &str) -> Entry {
        let (meta, body) = FrontMatter::split(document);

        let title = non_blank(meta.text("title"))
            .unwrap_or_else(|| helpers::humanize_slug(slug));
        let summary = non_blank(meta.text("summary")).or_else(|| non_blank(meta.text("description")));
        let date = non_blank(meta.text("date")).map(|d| EntryDate::new(&d));
        let image = non_blank(meta.text("image"));

        Entry {
            category: self.config.category.clone(),
            slug: slug.to_string(),
            title,
            summary,
            date,
            tags: meta.list("tags"),
            image,
            pinned: meta.flag("pinned").unwrap_or(false),
            reading_minutes: self.renderer.reading_minutes(body),
            href: self.config.href_for(slug),
            html: self.renderer.render(body),
            meta,
        }
    }

    fn is_entry_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.config.accepts_extension(e))
            .unwrap_or(false)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.contains(|c: char| matches!(c, '/' | '\\' | '\0'))
        && slug != "."
        && slug != ".."
}
