//! Local HTTP service for the Corpusvet review dashboard.
//!
//! Thin transport over `corpusvet-core`: the desktop shell (or a browser
//! pointed at the same port) drives the review flow through a handful of
//! JSON endpoints. All engine calls are synchronous filesystem work and run
//! inside `spawn_blocking`.

use std::path::PathBuf;

use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;

pub mod api;

/// Application state shared across HTTP handlers. The default review root
/// is explicit state, never a process-wide global.
#[derive(Clone)]
pub struct AppState {
    pub started_at: DateTime<Utc>,
    pub default_root: Option<PathBuf>,
}

impl AppState {
    pub fn new(default_root: Option<PathBuf>) -> Self {
        Self {
            started_at: Utc::now(),
            default_root,
        }
    }
}

/// Build the application router. The renderer origin is arbitrary (file://
/// or a dev server), so CORS is permissive — the service binds loopback.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/api/default-root", get(api::default_root))
        .route("/api/list-directory", post(api::list_directory))
        .route("/api/get-files", post(api::get_files))
        .route("/api/save-file", post(api::save_file))
        .route("/api/skip-file", post(api::skip_file))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
