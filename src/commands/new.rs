//! Create a new entry

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Folio;

/// Create a new entry file in the first directory of `category`
pub fn create_entry(
    folio: &Folio,
    category: &str,
    title: &str,
    slug: Option<&str>,
) -> Result<PathBuf> {
    let Some(cat) = folio.config.content.get(category) else {
        anyhow::bail!(
            "Unknown category: {}. Available: {}",
            category,
            folio.config.categories().collect::<Vec<_>>().join(", ")
        );
    };
    let Some(dir) = cat.dirs.first() else {
        anyhow::bail!("Category {} has no content directories", category);
    };

    let slug = match slug {
        Some(s) => slug::slugify(s),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from {:?}", title);
    }

    let target_dir = folio.base_dir.join(dir);
    fs::create_dir_all(&target_dir)?;

    let ext = folio
        .config
        .extensions
        .first()
        .map(String::as_str)
        .unwrap_or("md");
    let file_path = target_dir.join(format!("{}.{}", slug, ext));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let today = chrono::Local::now().format("%Y-%m-%d");
    let content = format!(
        "---\ntitle: \"{}\"\ndate: {}\nsummary:\ntags: []\npinned: false\n---\n",
        title.replace('"', "'"),
        today
    );
    fs::write(&file_path, content)?;

    tracing::info!("Created {:?}", file_path);
    Ok(file_path)
}
