//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use tessera_content::SiteContent;
use tessera_renderer::{ContentSource, PageRenderer};

use crate::error::ServerError;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Page renderer holding the session's library loader.
    pub(crate) renderer: Arc<PageRenderer>,
    /// Site content for the raw artifact and API routes.
    pub(crate) content: Arc<dyn ContentSource>,
}

impl AppState {
    /// Load site content off the async runtime.
    pub(crate) async fn site_content(&self) -> Result<Arc<SiteContent>, ServerError> {
        let source = Arc::clone(&self.content);
        tokio::task::spawn_blocking(move || source.site_content())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?
            .map_err(ServerError::from)
    }
}
