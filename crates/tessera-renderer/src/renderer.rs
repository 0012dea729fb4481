//! The page renderer state machine.

use std::sync::Arc;

use tessera_content::{Page, SiteContent};
use tessera_library::{ComponentRegistry, LibraryLoader};

use crate::source::ContentSource;
use crate::state::{RenderState, RenderedPage, RenderedSection, SectionOutcome, comment_safe};

/// Page key used when none is given.
const DEFAULT_PAGE_KEY: &str = "index";

/// Component used for sections whose own component is not registered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FallbackPolicy {
    component: Option<String>,
}

impl FallbackPolicy {
    /// Fall back to the named component.
    #[must_use]
    pub fn component(name: impl Into<String>) -> Self {
        Self {
            component: Some(name.into()),
        }
    }

    /// Never fall back; unresolved sections become markers.
    #[must_use]
    pub fn none() -> Self {
        Self { component: None }
    }

    /// Fallback component name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.component.as_deref()
    }
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self::component("List")
    }
}

/// Normalize a requested path into a page key.
///
/// Surrounding slashes are dropped and an empty key means `"index"`.
#[must_use]
pub fn normalize_page_key(key: &str) -> String {
    let key = key.trim_matches('/');
    if key.is_empty() {
        DEFAULT_PAGE_KEY.to_owned()
    } else {
        key.to_owned()
    }
}

/// Render a page's sections against a registry.
///
/// Sections are rendered in stored order. A section whose component is not
/// registered is rendered by the fallback component if that one is
/// registered, and otherwise replaced by an HTML comment marker.
pub fn render_page(
    page_key: &str,
    page: &Page,
    registry: &dyn ComponentRegistry,
    fallback: &FallbackPolicy,
) -> RenderedPage {
    let sections = page
        .sections()
        .iter()
        .map(|section| {
            let (outcome, html) = if let Some(component) = registry.resolve(&section.component) {
                (
                    SectionOutcome::Rendered,
                    component.render(&section.props, &section.content),
                )
            } else {
                let substitute = fallback
                    .name()
                    .and_then(|name| registry.resolve(name).map(|c| (name, c)));
                tracing::warn!(
                    page = %page_key,
                    section = %section.id,
                    component = %section.component,
                    fallback = substitute.as_ref().map(|(name, _)| *name),
                    "Component resolution miss"
                );
                match substitute {
                    Some((name, component)) => (
                        SectionOutcome::Fallback {
                            component: name.to_owned(),
                        },
                        component.render(&section.props, &section.content),
                    ),
                    None => (
                        SectionOutcome::Missing,
                        format!(
                            "<!-- missing component \"{}\" for section {} -->",
                            comment_safe(&section.component),
                            comment_safe(&section.id)
                        ),
                    ),
                }
            };

            RenderedSection {
                id: section.id.clone(),
                component: section.component.clone(),
                outcome,
                html,
            }
        })
        .collect();

    RenderedPage {
        page_key: page_key.to_owned(),
        sections,
    }
}

/// Renders page view requests.
///
/// Shares the session's [`LibraryLoader`]; cheap to wrap in an `Arc` and
/// use from many requests at once.
pub struct PageRenderer {
    loader: Arc<LibraryLoader>,
    content: Arc<dyn ContentSource>,
    fallback: FallbackPolicy,
}

impl PageRenderer {
    /// Create a renderer with the default fallback policy.
    pub fn new(loader: Arc<LibraryLoader>, content: Arc<dyn ContentSource>) -> Self {
        Self {
            loader,
            content,
            fallback: FallbackPolicy::default(),
        }
    }

    /// Replace the fallback policy.
    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// The session's library loader.
    pub fn loader(&self) -> &Arc<LibraryLoader> {
        &self.loader
    }

    /// Render a page, returning the terminal state.
    pub async fn render(&self, page_key: &str) -> RenderState {
        self.render_observed(page_key, |_| {}).await
    }

    /// Render a page, reporting every state it passes through.
    ///
    /// `observe` sees each state in order, the terminal one included.
    pub async fn render_observed(
        &self,
        page_key: &str,
        mut observe: impl FnMut(&RenderState) + Send,
    ) -> RenderState {
        let page_key = normalize_page_key(page_key);

        observe(&RenderState::LibraryPending);
        let library = match self.loader.load().await {
            Ok(library) => library,
            Err(error) => {
                tracing::warn!(page = %page_key, error = %error, "Cannot render page without component library");
                let state = RenderState::LibraryFailed(error);
                observe(&state);
                return state;
            }
        };

        observe(&RenderState::ContentPending);
        let state = match self.site_content().await {
            Some(content) => match content.page(&page_key) {
                Some(page) => RenderState::ContentReady(render_page(
                    &page_key,
                    page,
                    &*library,
                    &self.fallback,
                )),
                None => RenderState::ContentMissing { page_key },
            },
            None => RenderState::ContentMissing { page_key },
        };

        tracing::debug!(state = state.name(), "Page render finished");
        observe(&state);
        state
    }

    async fn site_content(&self) -> Option<Arc<SiteContent>> {
        let source = Arc::clone(&self.content);
        match tokio::task::spawn_blocking(move || source.site_content()).await {
            Ok(Ok(content)) => Some(content),
            Ok(Err(error)) => {
                tracing::warn!(error = %error, "Failed to load site content");
                None
            }
            Err(error) => {
                tracing::error!(error = %error, "Site content task failed");
                None
            }
        }
    }
}
