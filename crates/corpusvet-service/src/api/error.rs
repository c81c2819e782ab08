//! Error mapping from engine errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use corpusvet_core::mutate::MutateError;

/// Handler-level errors. Only failures on the directly-targeted path of a
/// mutation surface here; listing and record reads degrade in-handler.
#[derive(Debug)]
pub enum ApiError {
    /// Nothing to show or edit at this path (not a task, no ledger).
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl From<MutateError> for ApiError {
    fn from(err: MutateError) -> Self {
        match err {
            MutateError::NotATask(_) | MutateError::LedgerNotFound => {
                ApiError::NotFound(err.to_string())
            }
            MutateError::InvalidFilename(_) => ApiError::BadRequest(err.to_string()),
            MutateError::LedgerFormat | MutateError::Io(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

/// A blocking engine call panicked or was cancelled.
pub fn join_error(err: tokio::task::JoinError) -> ApiError {
    ApiError::Internal(format!("engine task failed: {err}"))
}
