//! Error type for the mock backend.
//!
//! [`BackendError`] implements [`axum::response::IntoResponse`] so handlers
//! can return `Result<…, BackendError>` directly. Bodies follow the
//! `{ "detail": "…" }` shape the real service uses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Errors a mock route can answer with.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// No record under the requested id / key.
    #[error("{0} not found")]
    NotFound(String),

    /// A record already exists under the requested id / key.
    #[error("{0} already exists")]
    Conflict(String),
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
        };
        let message = self.to_string();

        tracing::warn!(%status, error = %message, "request rejected");
        (status, Json(json!({ "detail": message }))).into_response()
    }
}
