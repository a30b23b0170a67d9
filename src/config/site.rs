//! Site configuration (_config.yml)

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::content::FeedConfig;
use crate::helpers;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub author: String,
    pub description: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub public_dir: String,
    /// Photo manifest, relative to the site root
    pub gallery: String,

    // Writing
    /// Reading speed used for `reading_minutes`
    pub words_per_minute: usize,
    /// File extensions picked up by feed scans
    pub extensions: Vec<String>,
    /// Moment.js-style format for displayed dates
    pub date_format: String,

    // Content categories, in display order
    pub content: IndexMap<String, CategoryConfig>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let mut content = IndexMap::new();
        content.insert(
            "project".to_string(),
            CategoryConfig::new(&["content/projects"], "/projects/:slug/"),
        );
        content.insert(
            "blog".to_string(),
            CategoryConfig::new(&["content/blog"], "/blog/:slug/"),
        );
        content.insert(
            "article".to_string(),
            CategoryConfig::new(&["content/articles"], "/articles/:slug/"),
        );

        Self {
            title: "Portfolio".to_string(),
            author: "John Doe".to_string(),
            description: String::new(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            public_dir: "public".to_string(),
            gallery: "content/gallery.yml".to_string(),

            words_per_minute: 220,
            extensions: vec!["md".to_string(), "mdx".to_string(), "markdown".to_string()],
            date_format: "MMM DD, YYYY".to_string(),

            content,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Names of the configured content categories
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.content.keys().map(String::as_str)
    }

    /// Build the feed configuration for one category
    ///
    /// Directories are resolved against `base_dir`; the href builder joins
    /// the site root with the category permalink.
    pub fn feed(&self, base_dir: &Path, category: &str) -> Option<FeedConfig> {
        let cat = self.content.get(category)?;
        let dirs = cat.dirs.iter().map(|d| base_dir.join(d)).collect();

        let root = self.root.clone();
        let pattern = cat.permalink.clone();
        let href_for_slug = move |slug: &str| {
            let path = helpers::permalink(&pattern, slug);
            format!(
                "{}/{}",
                root.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        };

        Some(
            FeedConfig::new(category, dirs, href_for_slug)
                .with_extensions(self.extensions.clone())
                .with_words_per_minute(self.words_per_minute),
        )
    }
}

/// One content category (project, blog, article, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    /// Directories scanned for entries, relative to the site root
    pub dirs: Vec<String>,
    /// Permalink pattern, `:slug` is replaced by the entry slug
    pub permalink: String,
}

impl CategoryConfig {
    fn new(dirs: &[&str], permalink: &str) -> Self {
        Self {
            dirs: dirs.iter().map(|d| d.to_string()).collect(),
            permalink: permalink.to_string(),
        }
    }
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            dirs: Vec::new(),
            permalink: "/:slug/".to_string(),
        }
    }
}
