//! Save and skip mutations against a task's ledger.

use std::path::PathBuf;

use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use corpusvet_core::mutate;

use super::error::{join_error, ApiError};

#[derive(Debug, Deserialize)]
pub struct SaveFileRequest {
    pub dir: String,
    #[serde(rename = "fileId")]
    pub file_id: String,
    pub status: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SkipFileRequest {
    pub dir: String,
    #[serde(rename = "fileId")]
    pub file_id: String,
}

/// POST /api/save-file
///
/// Optionally writes the edited record content verbatim, then marks the
/// record's ledger row. The editor owns the content format end to end; the
/// service never inspects it.
pub async fn save_file(Json(request): Json<SaveFileRequest>) -> Result<Json<Value>, ApiError> {
    let dir = PathBuf::from(request.dir);
    let status = tokio::task::spawn_blocking(move || -> Result<String, mutate::MutateError> {
        if let Some(content) = request.content.as_deref() {
            mutate::write_record_content(&dir, &request.file_id, content)?;
        }
        mutate::set_checked(&dir, &request.file_id, request.status.as_deref())
    })
    .await
    .map_err(join_error)??;

    Ok(Json(json!({ "success": true, "status": status })))
}

/// POST /api/skip-file
///
/// Drops the record's row from the ledger so it no longer counts toward
/// the task total. Requires an existing ledger.
pub async fn skip_file(Json(request): Json<SkipFileRequest>) -> Result<Json<Value>, ApiError> {
    let dir = PathBuf::from(request.dir);
    tokio::task::spawn_blocking(move || mutate::remove_row(&dir, &request.file_id))
        .await
        .map_err(join_error)??;

    Ok(Json(json!({ "success": true })))
}
