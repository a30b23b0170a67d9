//! List site content

use anyhow::Result;
use std::collections::BTreeMap;

use crate::content::Entry;
use crate::Folio;

/// List one category, the gallery, or every category when none is given
pub fn run(folio: &Folio, category: Option<&str>) -> Result<()> {
    match category {
        Some("gallery" | "photos") => list_gallery(folio),
        Some("tag" | "tags") => list_tags(folio),
        Some(category) => list_category(folio, category),
        None => {
            for category in folio.config.categories() {
                list_category(folio, category)?;
            }
            Ok(())
        }
    }
}

fn list_category(folio: &Folio, category: &str) -> Result<()> {
    let entries = folio.feed(category)?.entries();
    println!("{} ({}):", category, entries.len());
    for entry in &entries {
        println!("  {}", describe(folio, entry));
    }
    Ok(())
}

fn describe(folio: &Folio, entry: &Entry) -> String {
    let date = entry
        .date
        .as_ref()
        .map(|d| d.display(&folio.config.date_format))
        .unwrap_or_else(|| "undated".to_string());
    let pin = if entry.pinned { "📌 " } else { "" };
    format!(
        "{}{} - {} [{}] ({} min)\n      {}",
        pin,
        date,
        entry.title,
        entry.slug,
        entry.reading_minutes,
        entry.excerpt(72)
    )
}

fn list_tags(folio: &Folio) -> Result<()> {
    let mut tags: BTreeMap<String, usize> = BTreeMap::new();
    for category in folio.config.categories() {
        for entry in folio.feed(category)?.entries() {
            for tag in entry.tags {
                *tags.entry(tag).or_insert(0) += 1;
            }
        }
    }

    println!("Tags ({}):", tags.len());
    let mut tags: Vec<_> = tags.into_iter().collect();
    tags.sort_by(|a, b| b.1.cmp(&a.1));
    for (tag, count) in tags {
        println!("  {} ({})", tag, count);
    }
    Ok(())
}

fn list_gallery(folio: &Folio) -> Result<()> {
    let gallery = folio.gallery()?;
    println!("Photos ({}):", gallery.photos.len());
    for photo in &gallery.photos {
        let place = photo
            .location
            .map(|l| format!("{:.4}, {:.4}", l.lat, l.lng))
            .unwrap_or_else(|| "no location".to_string());
        println!("  {} - {} [{}]", photo.id, photo.src, place);
    }
    Ok(())
}
