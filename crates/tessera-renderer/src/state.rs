//! Render states and rendered output.

use tessera_library::{LibraryLoadError, escape_html};

/// How a section's component was resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SectionOutcome {
    /// The named component rendered the section.
    Rendered,
    /// The named component was missing; the fallback rendered instead.
    Fallback {
        /// Name of the fallback component.
        component: String,
    },
    /// Neither the named component nor a fallback was available.
    Missing,
}

/// One rendered section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedSection {
    /// Section ordering id.
    pub id: String,
    /// Component the section asked for.
    pub component: String,
    /// Resolution outcome.
    pub outcome: SectionOutcome,
    /// Rendered HTML (a comment marker when missing).
    pub html: String,
}

/// A fully rendered page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedPage {
    /// Normalized page key.
    pub page_key: String,
    /// Sections in stored order.
    pub sections: Vec<RenderedSection>,
}

impl RenderedPage {
    /// Page HTML wrapped in the page container.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::from("<div class=\"page\">");
        for section in &self.sections {
            html.push_str(&section.html);
        }
        html.push_str("</div>");
        html
    }

    /// Sections whose component was not found, with or without fallback.
    pub fn misses(&self) -> impl Iterator<Item = &RenderedSection> {
        self.sections
            .iter()
            .filter(|s| s.outcome != SectionOutcome::Rendered)
    }
}

/// State of a single page view request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RenderState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Waiting for the component library.
    LibraryPending,
    /// The component library could not be loaded.
    LibraryFailed(LibraryLoadError),
    /// Library ready, looking up page content.
    ContentPending,
    /// The page key is not in the site content.
    ContentMissing {
        /// Normalized page key that was requested.
        page_key: String,
    },
    /// The page rendered.
    ContentReady(RenderedPage),
}

impl RenderState {
    /// True for states that end a request.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::LibraryFailed(_) | Self::ContentMissing { .. } | Self::ContentReady(_)
        )
    }

    /// Short state name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::LibraryPending => "library_pending",
            Self::LibraryFailed(_) => "library_failed",
            Self::ContentPending => "content_pending",
            Self::ContentMissing { .. } => "content_missing",
            Self::ContentReady(_) => "content_ready",
        }
    }

    /// In-place HTML for the state.
    ///
    /// Failure states render a message instead of partial content.
    #[must_use]
    pub fn to_html(&self) -> String {
        match self {
            Self::Idle | Self::LibraryPending | Self::ContentPending => {
                "<div class=\"loading\">Loading...</div>".to_owned()
            }
            Self::LibraryFailed(error) => format!(
                "<div class=\"error\">Component library unavailable<!-- {} --></div>",
                comment_safe(&error.to_string())
            ),
            Self::ContentMissing { .. } => "<div class=\"not-found\">Page not found</div>".to_owned(),
            Self::ContentReady(page) => page.to_html(),
        }
    }
}

/// Text safe to embed inside an HTML comment.
pub(crate) fn comment_safe(text: &str) -> String {
    escape_html(text).replace("--", "&#45;&#45;")
}
