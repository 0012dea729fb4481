//! Error types for content collection.

use std::path::PathBuf;

/// Error for a single content file.
///
/// Parse errors are isolated to the file that produced them: the page
/// collector logs them and keeps going with the remaining files.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        /// Path of the unreadable file.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The front matter block is not valid YAML or has the wrong shape.
    #[error("Invalid metadata in {file}: {message}")]
    Metadata {
        /// File name of the content source.
        file: String,
        /// Parser message.
        message: String,
    },
    /// The front matter does not name a component.
    #[error("Missing `component` in metadata of {file}")]
    MissingComponent {
        /// File name of the content source.
        file: String,
    },
}

/// Structural error while collecting the site.
///
/// Unlike [`ParseError`], these abort the build.
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    /// Content root does not exist.
    #[error("Content root not found: {}", .0.display())]
    RootNotFound(PathBuf),
    /// Content root (or a page path) is not a directory.
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    /// I/O error while listing directories or writing the artifact.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Artifact (de)serialization failed.
    #[error("Invalid site content artifact: {0}")]
    Artifact(#[from] serde_json::Error),
}

impl CollectionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
