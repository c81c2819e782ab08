//! Directory listing for the review dashboard.

use std::path::PathBuf;

use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use corpusvet_core::classify;

use super::error::{join_error, ApiError};

#[derive(Debug, Deserialize)]
pub struct ListDirectoryRequest {
    #[serde(rename = "currentPath")]
    pub current_path: Option<String>,
}

/// POST /api/list-directory
///
/// Immediate subdirectories of the requested path with their Task/Container
/// classification and progress. A missing or unset path yields an empty
/// listing, never an error — the dashboard treats that as "pick a root".
pub async fn list_directory(
    Json(request): Json<ListDirectoryRequest>,
) -> Result<Json<Value>, ApiError> {
    let Some(path) = request
        .current_path
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
    else {
        return Ok(Json(json!({ "items": [], "parent": null })));
    };
    if !path.exists() {
        return Ok(Json(json!({ "items": [], "parent": null })));
    }

    let listing = tokio::task::spawn_blocking(move || classify::list_directory(&path))
        .await
        .map_err(join_error)?;
    Ok(Json(json!({ "items": listing.items, "parent": listing.parent })))
}
