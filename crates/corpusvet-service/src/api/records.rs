//! Record retrieval for the review editor.

use std::path::PathBuf;

use axum::Json;
use serde::Deserialize;

use corpusvet_core::records::{load_records, Record};

use super::error::{join_error, ApiError};

#[derive(Debug, Deserialize)]
pub struct GetFilesRequest {
    pub dir: Option<String>,
}

/// POST /api/get-files
///
/// All records of the task at `dir`, in diff-file order. Any resolution or
/// format failure degrades to an empty array so the editor never hard-fails
/// on one bad task; the cause is logged.
pub async fn get_files(Json(request): Json<GetFilesRequest>) -> Result<Json<Vec<Record>>, ApiError> {
    let Some(dir) = request
        .dir
        .filter(|d| !d.trim().is_empty())
        .map(PathBuf::from)
    else {
        return Ok(Json(Vec::new()));
    };

    let records = tokio::task::spawn_blocking(move || match load_records(&dir) {
        Ok(records) => records,
        Err(err) => {
            tracing::warn!(dir = %dir.display(), %err, "record load degraded to empty list");
            Vec::new()
        }
    })
    .await
    .map_err(join_error)?;
    Ok(Json(records))
}
