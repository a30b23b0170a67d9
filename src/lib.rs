//! folio: content engine for a personal portfolio site
//!
//! Turns flat markdown files with front-matter into metadata records and
//! safe HTML fragments, assembles sorted feeds for projects, blog posts and
//! articles, and exposes the photo gallery manifest to the map view.

pub mod commands;
pub mod config;
pub mod content;
pub mod gallery;
pub mod helpers;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{FeedError, FeedLoader};

/// Name of the site configuration file
pub const CONFIG_FILE: &str = "_config.yml";

/// The main site handle
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Folio {
    /// Open a site rooted at a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} found, using defaults", CONFIG_FILE);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Open a site with an explicit configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let public_dir = base_dir.join(&config.public_dir);
        Self {
            config,
            base_dir,
            public_dir,
        }
    }

    /// Loader for one content category
    pub fn feed(&self, category: &str) -> Result<FeedLoader, FeedError> {
        self.config
            .feed(&self.base_dir, category)
            .map(FeedLoader::new)
            .ok_or_else(|| FeedError::UnknownCategory(category.to_string()))
    }

    /// Path of the gallery manifest
    pub fn gallery_path(&self) -> PathBuf {
        self.base_dir.join(&self.config.gallery)
    }

    /// Load the photo gallery
    pub fn gallery(&self) -> Result<gallery::Gallery, gallery::GalleryError> {
        gallery::Gallery::load(self.gallery_path())
    }

    /// Build the public directory
    pub fn build(&self) -> Result<()> {
        commands::build::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_config_file() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();
        assert_eq!(folio.public_dir, tmp.path().join("public"));
        assert!(folio.feed("blog").unwrap().entries().is_empty());
    }

    #[test]
    fn test_unknown_category() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();
        assert!(matches!(
            folio.feed("recipes"),
            Err(FeedError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_config_file_is_loaded() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "public_dir: dist\ncontent:\n  note:\n    dirs: [notes]\n    permalink: /n/:slug\n",
        )
        .unwrap();
        fs::create_dir_all(tmp.path().join("notes")).unwrap();
        fs::write(tmp.path().join("notes/first.md"), "---\ntitle: First\n---\nHi").unwrap();

        let folio = Folio::new(tmp.path()).unwrap();
        assert_eq!(folio.public_dir, tmp.path().join("dist"));
        let entries = folio.feed("note").unwrap().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].href, "/n/first");
    }
}
