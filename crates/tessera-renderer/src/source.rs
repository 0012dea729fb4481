//! Where the renderer gets site content from.

use std::path::PathBuf;
use std::sync::Arc;

use tessera_content::{CollectionError, SiteContent};

/// Provides the site content artifact.
///
/// Called from a blocking context, so implementations may do file I/O.
pub trait ContentSource: Send + Sync {
    /// Current site content.
    fn site_content(&self) -> Result<Arc<SiteContent>, CollectionError>;
}

/// Content loaded once at startup.
#[derive(Clone, Debug)]
pub struct Preloaded(pub Arc<SiteContent>);

impl ContentSource for Preloaded {
    fn site_content(&self) -> Result<Arc<SiteContent>, CollectionError> {
        Ok(Arc::clone(&self.0))
    }
}

/// Content re-read from the artifact file on every request.
///
/// Picks up a fresh `tessera build` without restarting the server.
#[derive(Clone, Debug)]
pub struct ArtifactFile {
    path: PathBuf,
}

impl ArtifactFile {
    /// Create a source for the artifact at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Artifact path.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ContentSource for ArtifactFile {
    fn site_content(&self) -> Result<Arc<SiteContent>, CollectionError> {
        SiteContent::read_from(&self.path).map(Arc::new)
    }
}
