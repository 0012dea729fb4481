//! Site content artifact endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /content.json.
pub(crate) async fn get_content(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let content = state.site_content().await?;
    let json = content.to_json()?;
    Ok(([(header::CONTENT_TYPE, "application/json")], json))
}
