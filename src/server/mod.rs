//! HTTP read side of the store: template downloads and a JSON listing.

use crate::error::{Result, VaultError};
use crate::store::{resolve_within, Catalog, CatalogEntry};
use axum::{
    extract::{Path as UrlPath, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// HTTP server exposing the destination store
pub struct VaultHttpServer {
    store_dir: PathBuf,
    allowed_origins: Vec<String>,
}

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    store_dir: Arc<PathBuf>,
}

impl VaultHttpServer {
    pub fn new(store_dir: PathBuf, allowed_origins: Vec<String>) -> Self {
        Self {
            store_dir,
            allowed_origins,
        }
    }

    /// Run the HTTP server
    pub async fn run(&self, port: u16) -> Result<()> {
        let app = self.create_router();

        let addr = format!("127.0.0.1:{}", port);
        log::info!("Serving templates from {}", self.store_dir.display());
        log::info!("Download endpoint: http://{}/download/<slug>", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
            VaultError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to bind to {}: {}", addr, e),
            ))
        })?;

        axum::serve(listener, app).await.map_err(|e| {
            VaultError::Io(std::io::Error::other(format!("HTTP server error: {}", e)))
        })?;

        Ok(())
    }

    /// Create the axum router
    pub fn create_router(&self) -> Router {
        let cors = if self.allowed_origins.is_empty() {
            CorsLayer::new().allow_origin(Any).allow_methods(Any)
        } else {
            let origins: Vec<HeaderValue> = self
                .allowed_origins
                .iter()
                .filter_map(|o| o.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
        };

        Router::new()
            .route("/download/", get(handle_missing_slug))
            .route("/download/:slug", get(handle_download))
            .route("/entries", get(handle_entries))
            .route("/health", get(handle_health))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(cors),
            )
            .with_state(AppState {
                store_dir: Arc::new(self.store_dir.clone()),
            })
    }
}

/// Load the catalog off the async runtime; the store can change between requests.
async fn load_catalog(store_dir: &Path) -> Result<Catalog> {
    let store_dir = store_dir.to_path_buf();
    tokio::task::spawn_blocking(move || Catalog::load(&store_dir))
        .await
        .map_err(|e| VaultError::Io(std::io::Error::other(format!("catalog task join: {}", e))))?
}

fn text(status: StatusCode, body: &'static str) -> Response {
    (status, body).into_response()
}

/// Build the response for `GET /download/<slug>`.
pub async fn download_response(store_dir: &Path, slug: &str) -> Response {
    if slug.is_empty() {
        return text(StatusCode::BAD_REQUEST, "Missing slug.");
    }

    let catalog = match load_catalog(store_dir).await {
        Ok(c) => c,
        Err(e) => {
            log::error!("download {}: cannot load catalog: {}", slug, e);
            return text(StatusCode::INTERNAL_SERVER_ERROR, "Catalog unavailable.");
        }
    };

    let Some(entry) = catalog.find(slug) else {
        return text(StatusCode::NOT_FOUND, "Template not found.");
    };

    let Some(zip_path) = resolve_within(&entry.entry_dir, &entry.meta.zip_file) else {
        log::warn!(
            "download {}: zipFile {:?} escapes {}",
            slug,
            entry.meta.zip_file,
            entry.entry_dir.display()
        );
        return text(StatusCode::BAD_REQUEST, "Invalid zip path.");
    };

    let bytes = match tokio::fs::read(&zip_path).await {
        Ok(b) => b,
        Err(e) => {
            log::warn!("download {}: {}: {}", slug, zip_path.display(), e);
            return text(StatusCode::NOT_FOUND, "Zip file not found.");
        }
    };

    let disposition = format!("attachment; filename=\"{}.zip\"", slug);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_LENGTH, bytes.len().to_string()),
        ],
        bytes,
    )
        .into_response()
}

async fn handle_download(State(state): State<AppState>, UrlPath(slug): UrlPath<String>) -> Response {
    download_response(&state.store_dir, &slug).await
}

async fn handle_missing_slug() -> Response {
    text(StatusCode::BAD_REQUEST, "Missing slug.")
}

async fn handle_entries(State(state): State<AppState>) -> Response {
    match load_catalog(&state.store_dir).await {
        Ok(catalog) => {
            let entries: Vec<CatalogEntry> = catalog.entries().to_vec();
            Json(entries).into_response()
        }
        Err(e) => {
            log::error!("entries: cannot load catalog: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
    }
}

async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn store_with_entry(zip_file: Option<&str>) -> TempDir {
        let store = TempDir::new().unwrap();
        let dir = store.path().join("agency");
        fs::create_dir_all(dir.join("images")).unwrap();
        let mut doc = String::from("---\ntitle: Agency\n");
        if let Some(z) = zip_file {
            doc.push_str(&format!("zipFile: \"{}\"\n", z));
        }
        doc.push_str("---\n");
        fs::write(dir.join("entry.mdx"), doc).unwrap();
        store
    }

    async fn body_text(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[tokio::test]
    async fn test_download_serves_archive() {
        let store = store_with_entry(None);
        fs::write(store.path().join("agency/source.zip"), b"PK\x03\x04data").unwrap();

        let resp = download_response(store.path(), "agency").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/zip");
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"agency.zip\""
        );
        assert_eq!(resp.headers()[header::CONTENT_LENGTH], "8");
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"PK\x03\x04data");
    }

    #[tokio::test]
    async fn test_download_unknown_slug_is_not_found() {
        let store = store_with_entry(None);
        let resp = download_response(store.path(), "nope").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(resp).await, "Template not found.");
    }

    #[tokio::test]
    async fn test_download_empty_slug_is_bad_request() {
        let store = store_with_entry(None);
        let resp = download_response(store.path(), "").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(resp).await, "Missing slug.");
    }

    #[tokio::test]
    async fn test_download_traversal_is_bad_request() {
        let store = store_with_entry(Some("../../etc/passwd"));
        let resp = download_response(store.path(), "agency").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(resp).await, "Invalid zip path.");
    }

    #[tokio::test]
    async fn test_download_missing_archive_is_not_found() {
        let store = store_with_entry(Some("./bundle.zip"));
        let resp = download_response(store.path(), "agency").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(resp).await, "Zip file not found.");
    }

    #[tokio::test]
    async fn test_download_custom_zip_reference() {
        let store = store_with_entry(Some("./dist/bundle.zip"));
        fs::create_dir_all(store.path().join("agency/dist")).unwrap();
        fs::write(store.path().join("agency/dist/bundle.zip"), b"PK").unwrap();

        let resp = download_response(store.path(), "agency").await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_entries_lists_catalog() {
        let store = store_with_entry(None);
        let state = AppState {
            store_dir: Arc::new(store.path().to_path_buf()),
        };
        let resp = handle_entries(State(state)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(json[0]["id"], "agency");
        assert_eq!(json[0]["title"], "Agency");
    }
}
