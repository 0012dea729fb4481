//! Error types for library loading.

/// Failure to resolve the component library.
///
/// Cloned to every caller waiting on the same resolution.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LibraryLoadError {
    /// The module could not be fetched.
    #[error("Failed to fetch component library from {location}: {message}")]
    Network {
        /// URL or path of the module.
        location: String,
        /// Transport error message.
        message: String,
    },
    /// The module was fetched but is not a JSON object.
    #[error("Malformed component library: {0}")]
    Malformed(String),
    /// No usable component was exported.
    #[error("Component library exports no components")]
    Empty,
    /// The resolution task stopped before producing a result.
    #[error("Component library resolution was aborted")]
    Aborted,
}

/// Invalid component template.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// A `{{` without a matching `}}`.
    #[error("Unclosed placeholder at byte {0}")]
    Unclosed(usize),
    /// `{{ }}` with nothing inside.
    #[error("Empty placeholder at byte {0}")]
    EmptyPlaceholder(usize),
}
