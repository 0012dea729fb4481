//! Components and the registry that resolves them by name.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tessera_content::{Props, SectionContent};

use crate::error::LibraryLoadError;
use crate::module::normalize_exports;
use crate::template::TemplateComponent;

/// Something that renders a section to HTML.
pub trait Component: Send + Sync {
    /// Render the section's props and content.
    fn render(&self, props: &Props, content: &SectionContent) -> String;
}

impl<F> Component for F
where
    F: Fn(&Props, &SectionContent) -> String + Send + Sync,
{
    fn render(&self, props: &Props, content: &SectionContent) -> String {
        self(props, content)
    }
}

/// Name to component lookup.
pub trait ComponentRegistry: Send + Sync {
    /// Find a component by its exact name.
    fn resolve(&self, name: &str) -> Option<Arc<dyn Component>>;

    /// Number of registered components.
    fn len(&self) -> usize;

    /// True if nothing is registered.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory component registry.
#[derive(Clone, Default)]
pub struct ComponentLibrary {
    components: HashMap<String, Arc<dyn Component>>,
}

impl ComponentLibrary {
    /// Create an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration.
    #[must_use]
    pub fn with_component(mut self, name: impl Into<String>, component: impl Component + 'static) -> Self {
        self.insert(name, Arc::new(component));
        self
    }

    /// Register a component, replacing any previous one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, component: Arc<dyn Component>) {
        self.components.insert(name.into(), component);
    }

    /// Registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.components.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build a library from a resolved module.
    ///
    /// Each export entry is either a template string or an object with a
    /// `template` string. Entries that are neither, or whose template does
    /// not parse, are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryLoadError::Malformed`] if the module is not an
    /// object and [`LibraryLoadError::Empty`] if no entry is usable.
    pub fn from_module(raw: &Value) -> Result<Self, LibraryLoadError> {
        let exports = normalize_exports(raw)?;

        let mut library = Self::new();
        for (name, entry) in exports {
            let template = match entry {
                Value::String(template) => Some(template.as_str()),
                Value::Object(fields) => fields.get("template").and_then(Value::as_str),
                _ => None,
            };
            let Some(template) = template else {
                tracing::warn!(component = %name, "Skipping library export without a template");
                continue;
            };
            match TemplateComponent::parse(template) {
                Ok(component) => library.insert(name.clone(), Arc::new(component)),
                Err(e) => {
                    tracing::warn!(component = %name, error = %e, "Skipping library export with invalid template");
                }
            }
        }

        if library.components.is_empty() {
            return Err(LibraryLoadError::Empty);
        }
        Ok(library)
    }
}

impl ComponentRegistry for ComponentLibrary {
    fn resolve(&self, name: &str) -> Option<Arc<dyn Component>> {
        self.components.get(name).map(Arc::clone)
    }

    fn len(&self) -> usize {
        self.components.len()
    }
}

impl fmt::Debug for ComponentLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentLibrary")
            .field("components", &self.names())
            .finish()
    }
}
