//! Build the public directory
//!
//! Each category gets `index.json` (the feed, without bodies) plus one
//! `<slug>.html` fragment and `<slug>.json` record per entry. The gallery is
//! written as `gallery.json` and `map-points.json`.

use anyhow::{Context, Result};
use notify::Watcher;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::content::Entry;
use crate::gallery::{self, Gallery, Photo};
use crate::{Folio, CONFIG_FILE};

/// Feed listing written into each category directory
const FEED_INDEX: &str = "index.json";

/// What a build wrote
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub entries: usize,
    pub photos: usize,
}

#[derive(Serialize)]
struct GalleryIndex<'a> {
    tags: Vec<String>,
    photos: &'a [Photo],
}

/// Build everything from scratch
pub fn run(folio: &Folio) -> Result<()> {
    let start = Instant::now();
    let report = build(folio)?;
    tracing::info!(
        "Built {} entries and {} photos in {:.2}s",
        report.entries,
        report.photos,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Re-scan all content and write the public directory
pub fn build(folio: &Folio) -> Result<BuildReport> {
    fs::create_dir_all(&folio.public_dir)
        .with_context(|| format!("Failed to create {:?}", folio.public_dir))?;

    let mut report = BuildReport::default();

    for category in folio.config.categories() {
        let entries = folio.feed(category)?.entries();
        write_category(&folio.public_dir.join(category), &entries)?;
        tracing::debug!("{}: {} entries", category, entries.len());
        report.entries += entries.len();
    }

    let gallery = folio.gallery()?;
    write_gallery(&folio.public_dir, &gallery)?;
    report.photos = gallery.photos.len();

    Ok(report)
}

fn write_category(dir: &Path, entries: &[Entry]) -> Result<()> {
    // Stale entries from an earlier build must not linger
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)?;

    let listing: Vec<Entry> = entries.iter().map(Entry::summary_only).collect();
    write_json(&dir.join(FEED_INDEX), &listing)?;

    for entry in entries {
        fs::write(dir.join(format!("{}.html", entry.slug)), &entry.html)?;

        let record = format!("{}.json", entry.slug);
        if record.eq_ignore_ascii_case(FEED_INDEX) {
            tracing::warn!(
                "Not writing {:?}: it would replace the feed listing",
                dir.join(&record)
            );
            continue;
        }
        write_json(&dir.join(record), entry)?;
    }

    Ok(())
}

fn write_gallery(public_dir: &Path, gallery: &Gallery) -> Result<()> {
    let index = GalleryIndex {
        tags: gallery.tags(),
        photos: &gallery.photos,
    };
    write_json(&public_dir.join("gallery.json"), &index)?;

    let points = gallery::map_points(&gallery.filter(None));
    write_json(&public_dir.join("map-points.json"), &points)?;
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

/// Watch content, gallery and config for changes and rebuild
///
/// Blocks the calling thread until the watcher goes away.
pub fn watch(folio: &Folio) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    for category in folio.config.content.values() {
        for dir in &category.dirs {
            let path = folio.base_dir.join(dir);
            if path.is_dir() {
                watcher.watch(&path, notify::RecursiveMode::NonRecursive)?;
                tracing::debug!("Watching: {:?}", path);
            }
        }
    }

    for file in [folio.gallery_path(), folio.base_dir.join(CONFIG_FILE)] {
        if file.exists() {
            watcher.watch(&file, notify::RecursiveMode::NonRecursive)?;
            tracing::debug!("Watching: {:?}", file);
        }
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut last_rebuild = Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, rebuilding...");
                    // Config may have changed too
                    let result = Folio::new(&folio.base_dir).and_then(|f| run(&f));
                    if let Err(e) = result {
                        tracing::error!("Build failed: {}", e);
                    }
                    last_rebuild = Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                // Continue waiting
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site() -> (TempDir, Folio) {
        let tmp = TempDir::new().unwrap();
        let blog = tmp.path().join("content/blog");
        fs::create_dir_all(&blog).unwrap();
        fs::write(
            blog.join("first.md"),
            "---\ntitle: First\ndate: 2024-01-01\n---\nHello <world>\n",
        )
        .unwrap();
        fs::write(
            tmp.path().join("content/gallery.yml"),
            "photos:\n  - id: p1\n    src: /p1.jpg\n    location: { lat: 1.5, lng: 2.5 }\n  - id: p2\n    src: /p2.jpg\n",
        )
        .unwrap();
        let folio = Folio::new(tmp.path()).unwrap();
        (tmp, folio)
    }

    #[test]
    fn test_build_writes_feeds_and_fragments() {
        let (_tmp, folio) = site();
        let report = build(&folio).unwrap();
        assert_eq!(report, BuildReport { entries: 1, photos: 2 });

        let blog = folio.public_dir.join("blog");
        let html = fs::read_to_string(blog.join("first.html")).unwrap();
        assert_eq!(html, "<p>Hello &lt;world&gt;</p>");

        let index: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(blog.join("index.json")).unwrap()).unwrap();
        assert_eq!(index[0]["title"], "First");
        assert_eq!(index[0]["href"], "/blog/first/");
        assert!(index[0].get("html").is_none());

        // Categories without a directory still get an empty feed
        let projects = fs::read_to_string(folio.public_dir.join("project/index.json")).unwrap();
        assert_eq!(projects.trim(), "[]");

        let points: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(folio.public_dir.join("map-points.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(
            points,
            serde_json::json!([{ "id": "p1", "latitude": 1.5, "longitude": 2.5 }])
        );
    }

    #[test]
    fn test_index_entry_keeps_feed_listing() {
        let (tmp, folio) = site();
        fs::write(
            tmp.path().join("content/blog/index.md"),
            "---\ntitle: Index\ndate: 2023-01-01\n---\nAbout\n",
        )
        .unwrap();
        let report = build(&folio).unwrap();
        assert_eq!(report.entries, 2);

        let blog = folio.public_dir.join("blog");
        let index: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(blog.join("index.json")).unwrap()).unwrap();
        let titles: Vec<&str> = index
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["First", "Index"]);
        assert_eq!(
            fs::read_to_string(blog.join("index.html")).unwrap(),
            "<p>About</p>"
        );
    }

    #[test]
    fn test_rebuild_drops_removed_entries() {
        let (tmp, folio) = site();
        build(&folio).unwrap();
        fs::remove_file(tmp.path().join("content/blog/first.md")).unwrap();
        build(&folio).unwrap();
        assert!(!folio.public_dir.join("blog/first.html").exists());
    }
}
