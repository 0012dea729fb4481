//! Once-per-session library resolution.
//!
//! The loader is a small state machine:
//!
//! ```text
//! Idle ──load()──► Pending ──ok──► Ready (terminal)
//!   ▲                 │
//!   └──────err────────┘
//! ```
//!
//! While pending, every caller waits on the same watch channel, so the
//! module is fetched at most once per attempt. The fetch runs on a detached
//! task: a caller that stops waiting does not cancel it for the others.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::component::{ComponentLibrary, ComponentRegistry};
use crate::error::LibraryLoadError;
use crate::module::ModuleSource;

type Outcome = Result<Arc<ComponentLibrary>, LibraryLoadError>;

enum LoaderState {
    Idle,
    Pending(watch::Receiver<Option<Outcome>>),
    Ready(Arc<ComponentLibrary>),
}

/// Memoized, shared loader for the component library.
pub struct LibraryLoader {
    source: Arc<dyn ModuleSource>,
    state: Arc<Mutex<LoaderState>>,
}

impl LibraryLoader {
    /// Create a loader for the given module source.
    pub fn new(source: impl ModuleSource + 'static) -> Self {
        Self::from_source(Arc::new(source))
    }

    /// Create a loader from a shared module source.
    pub fn from_source(source: Arc<dyn ModuleSource>) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(LoaderState::Idle)),
        }
    }

    /// Resolve the library.
    ///
    /// The first call starts the resolution; concurrent calls join it and
    /// all receive the same outcome. After success the library is returned
    /// without further fetches. After failure the loader is idle again and
    /// the next call starts a new attempt.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn load(&self) -> Outcome {
        let mut receiver = {
            let mut state = self.lock();
            match &*state {
                LoaderState::Ready(library) => return Ok(Arc::clone(library)),
                LoaderState::Pending(receiver) => receiver.clone(),
                LoaderState::Idle => {
                    let (sender, receiver) = watch::channel(None);
                    *state = LoaderState::Pending(receiver.clone());
                    self.spawn_resolution(sender);
                    receiver
                }
            }
        };

        match receiver.wait_for(Option::is_some).await {
            Ok(outcome) => (*outcome).clone().unwrap_or(Err(LibraryLoadError::Aborted)),
            Err(_) => Err(LibraryLoadError::Aborted),
        }
    }

    /// True once a resolution has succeeded.
    pub fn is_ready(&self) -> bool {
        matches!(*self.lock(), LoaderState::Ready(_))
    }

    /// The resolved library, if ready.
    pub fn library(&self) -> Option<Arc<ComponentLibrary>> {
        match &*self.lock() {
            LoaderState::Ready(library) => Some(Arc::clone(library)),
            _ => None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LoaderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn spawn_resolution(&self, sender: watch::Sender<Option<Outcome>>) {
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            let location = source.location();
            tracing::info!(location = %location, "Loading component library");

            let fetched = tokio::task::spawn_blocking(move || {
                let raw = source.fetch()?;
                ComponentLibrary::from_module(&raw)
            })
            .await;

            let outcome = match fetched {
                Ok(result) => result.map(Arc::new),
                Err(e) => {
                    tracing::error!(error = %e, "Component library task failed");
                    Err(LibraryLoadError::Aborted)
                }
            };

            match &outcome {
                Ok(library) => {
                    tracing::info!(location = %location, components = library.len(), "Component library loaded");
                }
                Err(e) => {
                    tracing::warn!(location = %location, error = %e, "Component library failed to load");
                }
            }

            {
                let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                *state = match &outcome {
                    Ok(library) => LoaderState::Ready(Arc::clone(library)),
                    Err(_) => LoaderState::Idle,
                };
            }
            sender.send_replace(Some(outcome));
        });
    }
}
