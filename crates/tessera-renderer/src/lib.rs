//! Page rendering for tessera.
//!
//! A page view request moves through a fixed state machine:
//!
//! ```text
//! Idle ─► LibraryPending ─┬─► LibraryFailed
//!                         └─► ContentPending ─┬─► ContentMissing
//!                                             └─► ContentReady
//! ```
//!
//! [`PageRenderer`] drives one request through it. [`PageView`] sits on top
//! and makes sure only the latest request's result is ever displayed.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use tessera_library::{HttpModuleSource, LibraryLoader};
//! use tessera_renderer::{ArtifactFile, PageRenderer, RenderState};
//!
//! # async fn run() {
//! let loader = Arc::new(LibraryLoader::new(HttpModuleSource::new(
//!     "http://localhost:3001/components.json",
//!     Duration::from_secs(30),
//! )));
//! let renderer = PageRenderer::new(loader, Arc::new(ArtifactFile::new("dist/content.json")));
//!
//! if let RenderState::ContentReady(page) = renderer.render("/home").await {
//!     println!("{}", page.to_html());
//! }
//! # }
//! ```

mod renderer;
mod source;
mod state;
mod view;

pub use renderer::{FallbackPolicy, PageRenderer, normalize_page_key, render_page};
pub use source::{ArtifactFile, ContentSource, Preloaded};
pub use state::{RenderState, RenderedPage, RenderedSection, SectionOutcome};
pub use view::PageView;
