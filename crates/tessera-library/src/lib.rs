//! Remote component library for tessera.
//!
//! Section rendering is delegated to components that live outside the
//! content tree. This crate resolves a component module once per session,
//! normalizes its export shape, and exposes the result as a
//! [`ComponentRegistry`].
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use tessera_library::{ComponentRegistry, HttpModuleSource, LibraryLoader};
//!
//! # async fn run() -> Result<(), tessera_library::LibraryLoadError> {
//! let source = HttpModuleSource::new("http://localhost:3001/components.json", Duration::from_secs(30));
//! let loader = LibraryLoader::new(source);
//!
//! let library = loader.load().await?;
//! assert!(library.resolve("Hero").is_some());
//! # Ok(())
//! # }
//! ```
//!
//! # Module shape
//!
//! A module is a JSON object mapping component names to templates. The
//! export may be nested under `default` or `default.default`; see
//! [`normalize_exports`].
//!
//! ```json
//! { "default": { "Hero": "<h1>{{ title }}</h1>{{ content }}" } }
//! ```

mod component;
mod error;
mod loader;
mod module;
mod template;

pub use component::{Component, ComponentLibrary, ComponentRegistry};
pub use error::{LibraryLoadError, TemplateError};
pub use loader::LibraryLoader;
pub use module::{FileModuleSource, HttpModuleSource, ModuleSource, normalize_exports};
pub use template::{TemplateComponent, escape_html};
