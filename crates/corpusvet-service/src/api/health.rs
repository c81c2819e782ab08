//! Health and startup-context endpoints.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "module": "corpusvet-service",
        "version": env!("CARGO_PKG_VERSION"),
        "started_at": state.started_at.to_rfc3339(),
    }))
}

/// GET /api/default-root
///
/// The corpus root the dashboard should open on, when one was configured.
pub async fn default_root(State(state): State<AppState>) -> Json<Value> {
    let root = state
        .default_root
        .as_ref()
        .map(|path| path.to_string_lossy().to_string());
    Json(json!({ "root": root }))
}
