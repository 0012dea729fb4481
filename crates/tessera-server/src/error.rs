//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Page key not in the site content.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// Site content artifact could not be loaded.
    #[error("Site content unavailable: {0}")]
    ContentUnavailable(#[from] tessera_content::CollectionError),

    /// Background task failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::PageNotFound(key) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Page not found", "page": key}),
            ),
            Self::ContentUnavailable(e) => {
                tracing::warn!(error = %e, "Site content unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({"error": "Site content unavailable"}),
                )
            }
            Self::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": message}),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}
