//! HTTP server for tessera sites.
//!
//! Serves rendered pages, the site content artifact, and a small JSON API
//! over the collected sections.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use std::time::Duration;
//! use tessera_config::LibraryLocation;
//! use tessera_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_string(),
//!         port: 7878,
//!         content_path: PathBuf::from("dist/content.json"),
//!         library: LibraryLocation::Url("http://localhost:3001/components.json".to_string()),
//!         fallback_component: "List".to_string(),
//!         library_timeout: Duration::from_secs(30),
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Routes
//!
//! ```text
//! GET /                 index page (HTML)
//! GET /{*path}          page by key (HTML)
//! GET /content.json     site content artifact
//! GET /api/pages/{*key} page sections (JSON)
//! ```

mod app;
mod error;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use state::AppState;
use tessera_config::LibraryLocation;
use tessera_library::{FileModuleSource, HttpModuleSource, LibraryLoader, ModuleSource};
use tessera_renderer::{ArtifactFile, ContentSource, FallbackPolicy, PageRenderer};

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Site content artifact, re-read on each request.
    pub content_path: PathBuf,
    /// Component library module location.
    pub library: LibraryLocation,
    /// Component used when a section's component is missing.
    pub fallback_component: String,
    /// HTTP timeout for fetching the library.
    pub library_timeout: Duration,
}

/// Run the server.
///
/// The component library starts loading immediately in the background;
/// requests that arrive before it is ready wait for the same load.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let module: Arc<dyn ModuleSource> = match &config.library {
        LibraryLocation::Url(url) => Arc::new(HttpModuleSource::new(url.clone(), config.library_timeout)),
        LibraryLocation::Path(path) => Arc::new(FileModuleSource::new(path.clone())),
    };
    let loader = Arc::new(LibraryLoader::from_source(module));

    if !config.content_path.exists() {
        tracing::warn!(
            path = %config.content_path.display(),
            "Site content artifact not found, run `tessera build` first"
        );
    }
    let content: Arc<dyn ContentSource> = Arc::new(ArtifactFile::new(config.content_path.clone()));

    let renderer = PageRenderer::new(Arc::clone(&loader), Arc::clone(&content))
        .with_fallback(FallbackPolicy::component(config.fallback_component.clone()));

    tokio::spawn(async move {
        if loader.load().await.is_err() {
            tracing::warn!("Component library unavailable at startup, requests will retry");
        }
    });

    let state = Arc::new(AppState {
        renderer: Arc::new(renderer),
        content,
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from tessera config.
#[must_use]
pub fn server_config_from_config(config: &tessera_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        content_path: config.content_resolved.output.clone(),
        library: config.library_resolved.location.clone(),
        fallback_component: config.library_resolved.fallback_component.clone(),
        library_timeout: config.library_resolved.timeout,
    }
}
