//! Feed API and static file server

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::{Entry, FeedError};
use crate::gallery::{self, MapPoint, Photo};
use crate::Folio;

type SharedFolio = Arc<Folio>;

#[derive(Debug, Deserialize)]
struct GalleryQuery {
    tag: Option<String>,
}

#[derive(Debug, Serialize)]
struct GalleryResponse {
    tags: Vec<String>,
    photos: Vec<Photo>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Build the application router
pub fn router(folio: Folio) -> Router {
    let public_dir = folio.public_dir.clone();

    Router::new()
        .route("/api/feed/:category", get(feed_handler))
        .route("/api/feed/:category/:slug", get(entry_handler))
        .route("/api/gallery", get(gallery_handler))
        .route("/api/gallery/points", get(points_handler))
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(folio))
}

/// Start the server
pub async fn start(folio: &Folio, ip: &str, port: u16, watch: bool) -> Result<()> {
    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    if watch {
        let watched = folio.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = crate::commands::build::watch(&watched) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(folio.clone())).await?;

    Ok(())
}

async fn feed_handler(
    State(folio): State<SharedFolio>,
    Path(category): Path<String>,
) -> Response {
    let result = tokio::task::spawn_blocking(move || {
        folio.feed(&category).map(|loader| {
            loader
                .entries()
                .iter()
                .map(Entry::summary_only)
                .collect::<Vec<_>>()
        })
    })
    .await;

    match result {
        Ok(Ok(entries)) => Json(entries).into_response(),
        Ok(Err(e)) => feed_error(e),
        Err(e) => internal_error(e),
    }
}

async fn entry_handler(
    State(folio): State<SharedFolio>,
    Path((category, slug)): Path<(String, String)>,
) -> Response {
    let result =
        tokio::task::spawn_blocking(move || folio.feed(&category)?.entry(&slug)).await;

    match result {
        Ok(Ok(entry)) => Json(entry).into_response(),
        Ok(Err(e)) => feed_error(e),
        Err(e) => internal_error(e),
    }
}

async fn gallery_handler(
    State(folio): State<SharedFolio>,
    Query(query): Query<GalleryQuery>,
) -> Response {
    let result = tokio::task::spawn_blocking(move || {
        folio.gallery().map(|gallery| GalleryResponse {
            tags: gallery.tags(),
            photos: gallery
                .filter(query.tag.as_deref())
                .into_iter()
                .cloned()
                .collect(),
        })
    })
    .await;

    match result {
        Ok(Ok(body)) => Json(body).into_response(),
        Ok(Err(e)) => internal_error(e),
        Err(e) => internal_error(e),
    }
}

async fn points_handler(
    State(folio): State<SharedFolio>,
    Query(query): Query<GalleryQuery>,
) -> Response {
    let result = tokio::task::spawn_blocking(move || {
        folio
            .gallery()
            .map(|gallery| gallery::map_points(&gallery.filter(query.tag.as_deref())))
    })
    .await;

    match result {
        Ok(Ok(points)) => Json::<Vec<MapPoint>>(points).into_response(),
        Ok(Err(e)) => internal_error(e),
        Err(e) => internal_error(e),
    }
}

fn feed_error(e: FeedError) -> Response {
    if e.is_not_found() {
        tracing::debug!("{}", e);
        error_response(StatusCode::NOT_FOUND, e.to_string())
    } else {
        internal_error(e)
    }
}

fn internal_error<E: std::fmt::Display>(e: E) -> Response {
    tracing::error!("Request failed: {}", e);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorBody { error })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> (TempDir, SharedFolio) {
        let tmp = TempDir::new().unwrap();
        let blog = tmp.path().join("content/blog");
        fs::create_dir_all(&blog).unwrap();
        fs::write(blog.join("a.md"), "---\ntitle: A\ndate: 2023-06-01\n---\nbody").unwrap();
        fs::write(blog.join("b.md"), "---\ntitle: B\ndate: 2024-01-01\n---\nbody").unwrap();
        fs::write(
            tmp.path().join("content/gallery.yml"),
            "photos:\n  - id: p1\n    src: /p1.jpg\n    tags: [sea]\n    location: { lat: 1.0, lng: 2.0 }\n  - id: p2\n    src: /p2.jpg\n    tags: [city]\n    location: { lat: 3.0, lng: 4.0 }\n",
        )
        .unwrap();
        let folio = Folio::new(tmp.path()).unwrap();
        (tmp, Arc::new(folio))
    }

    async fn json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_feed_is_sorted() {
        let (_tmp, folio) = site();
        let response = feed_handler(State(folio), Path("blog".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body[0]["title"], "B");
        assert_eq!(body[1]["title"], "A");
    }

    #[tokio::test]
    async fn test_unknown_category_is_404() {
        let (_tmp, folio) = site();
        let response = feed_handler(State(folio), Path("recipes".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_entry_lookup() {
        let (_tmp, folio) = site();
        let found = entry_handler(
            State(folio.clone()),
            Path(("blog".to_string(), "a".to_string())),
        )
        .await;
        assert_eq!(found.status(), StatusCode::OK);
        assert_eq!(json(found).await["html"], "<p>body</p>");

        let missing = entry_handler(
            State(folio),
            Path(("blog".to_string(), "nope".to_string())),
        )
        .await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_points_filtered_by_tag() {
        let (_tmp, folio) = site();
        let response = points_handler(
            State(folio),
            Query(GalleryQuery {
                tag: Some("city".to_string()),
            }),
        )
        .await;
        let body = json(response).await;
        assert_eq!(
            body,
            serde_json::json!([{ "id": "p2", "latitude": 3.0, "longitude": 4.0 }])
        );
    }
}
