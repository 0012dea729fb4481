//! Page endpoints.
//!
//! HTML routes run the full render state machine and map its terminal
//! state to a status code. The JSON route returns the stored sections.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tessera_content::Page;
use tessera_library::escape_html;
use tessera_renderer::{RenderState, normalize_page_key};

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET / (index page).
pub(crate) async fn get_root_page(State(state): State<Arc<AppState>>) -> Response {
    render_html(&state, "").await
}

/// Handle GET /{*path}.
pub(crate) async fn get_page(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    render_html(&state, &path).await
}

/// Handle GET /api/pages/{*key}.
pub(crate) async fn get_page_sections(
    Path(key): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Page>, ServerError> {
    let page_key = normalize_page_key(&key);
    let content = state.site_content().await?;
    content
        .page(&page_key)
        .cloned()
        .map(Json)
        .ok_or(ServerError::PageNotFound(page_key))
}

async fn render_html(state: &AppState, path: &str) -> Response {
    let page_key = normalize_page_key(path);
    let render_state = state.renderer.render(&page_key).await;
    (
        status_for(&render_state),
        Html(document(&page_key, &render_state.to_html())),
    )
        .into_response()
}

fn status_for(state: &RenderState) -> StatusCode {
    match state {
        RenderState::ContentReady(_) => StatusCode::OK,
        RenderState::ContentMissing { .. } => StatusCode::NOT_FOUND,
        RenderState::LibraryFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
        RenderState::Idle | RenderState::LibraryPending | RenderState::ContentPending => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Wrap rendered body HTML in a document shell.
fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<div id=\"root\">{body}</div>\n</body>\n</html>\n",
        escape_html(title)
    )
}
