//! Photo gallery manifest
//!
//! Photos are listed in a YAML manifest. The gallery page filters them by
//! tag and hands the geotagged ones to the map widget as bare
//! `{id, latitude, longitude}` points.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading the manifest
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("failed to read gallery manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid gallery manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Where a photo was taken
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    #[serde(alias = "lon", alias = "long")]
    pub lng: f64,
}

impl Location {
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// A single photo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    /// Image URL, usually on the CDN
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Photo {
    fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Marker handed to the map widget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Gallery {
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl Gallery {
    /// Load the manifest; a missing file is an empty gallery
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GalleryError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No gallery manifest at {:?}", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| GalleryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| GalleryError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Photos carrying `tag` (case-insensitive), or all photos, in manifest order
    pub fn filter(&self, tag: Option<&str>) -> Vec<&Photo> {
        match tag.map(str::trim).filter(|t| !t.is_empty()) {
            Some(tag) => self.photos.iter().filter(|p| p.has_tag(tag)).collect(),
            None => self.photos.iter().collect(),
        }
    }

    /// Every tag in use, sorted and de-duplicated
    ///
    /// Tags differing only in case are one tag, as in `filter`; the first
    /// spelling in manifest order is kept.
    pub fn tags(&self) -> Vec<String> {
        let mut tags = BTreeMap::new();
        for tag in self.photos.iter().flat_map(|p| &p.tags) {
            tags.entry(tag.to_lowercase()).or_insert_with(|| tag.clone());
        }
        tags.into_values().collect()
    }
}

/// Map markers for the given photos, skipping ones without a usable location
pub fn map_points(photos: &[&Photo]) -> Vec<MapPoint> {
    photos
        .iter()
        .filter_map(|photo| {
            let location = photo.location?;
            if !location.is_valid() {
                tracing::warn!(
                    "Photo {} has out-of-range coordinates ({}, {})",
                    photo.id,
                    location.lat,
                    location.lng
                );
                return None;
            }
            Some(MapPoint {
                id: photo.id.clone(),
                latitude: location.lat,
                longitude: location.lng,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
photos:
  - id: kyoto-1
    src: https://cdn.example.com/kyoto-1.jpg
    caption: Fushimi Inari
    tags: [Japan, street]
    location: { lat: 34.967, lng: 135.772 }
  - id: studio
    src: https://cdn.example.com/studio.jpg
    tags: [portrait]
  - id: broken
    src: https://cdn.example.com/broken.jpg
    tags: [japan]
    location: { lat: 123.0, lon: 10.0 }
"#;

    #[test]
    fn test_filter_by_tag() {
        let gallery = Gallery::from_yaml(MANIFEST).unwrap();
        let ids: Vec<&str> = gallery
            .filter(Some("japan"))
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["kyoto-1", "broken"]);
        assert_eq!(gallery.filter(None).len(), 3);
        assert_eq!(gallery.filter(Some("  ")).len(), 3);
    }

    #[test]
    fn test_tags() {
        let gallery = Gallery::from_yaml(MANIFEST).unwrap();
        assert_eq!(gallery.tags(), vec!["Japan", "portrait", "street"]);
        // every listed tag selects the photos filed under any spelling of it
        assert_eq!(gallery.filter(Some(gallery.tags()[0].as_str())).len(), 2);
    }

    #[test]
    fn test_map_points_skip_missing_and_invalid() {
        let gallery = Gallery::from_yaml(MANIFEST).unwrap();
        let points = map_points(&gallery.filter(None));
        assert_eq!(
            points,
            vec![MapPoint {
                id: "kyoto-1".to_string(),
                latitude: 34.967,
                longitude: 135.772,
            }]
        );
    }

    #[test]
    fn test_missing_manifest_is_empty() {
        let tmp = TempDir::new().unwrap();
        let gallery = Gallery::load(tmp.path().join("gallery.yml")).unwrap();
        assert!(gallery.photos.is_empty());
    }

    #[test]
    fn test_invalid_manifest_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gallery.yml");
        fs::write(&path, "photos: [{ id: 1 }]").unwrap();
        assert!(matches!(
            Gallery::load(&path),
            Err(GalleryError::Parse { .. })
        ));
    }
}
