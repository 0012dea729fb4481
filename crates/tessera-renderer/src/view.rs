//! A displayed page that follows navigation.
//!
//! Each [`PageView::navigate`] call takes a fresh generation token. Results
//! (intermediate states included) are committed only while their token is
//! still the current one, so a slow request can never overwrite the output
//! of a newer one, and nothing lands after [`PageView::unmount`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::renderer::PageRenderer;
use crate::state::RenderState;

/// Page view with superseded-request discard.
pub struct PageView {
    renderer: Arc<PageRenderer>,
    generation: AtomicU64,
    displayed: Mutex<RenderState>,
}

impl PageView {
    /// Create an idle view.
    pub fn new(renderer: Arc<PageRenderer>) -> Self {
        Self {
            renderer,
            generation: AtomicU64::new(0),
            displayed: Mutex::new(RenderState::Idle),
        }
    }

    /// Navigate to a page.
    ///
    /// Returns the terminal state if this request is still current when it
    /// finishes, or `None` if a later navigation or an unmount superseded it.
    pub async fn navigate(&self, page_key: &str) -> Option<RenderState> {
        let token = {
            let _displayed = self.lock();
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };

        let state = self
            .renderer
            .render_observed(page_key, |state| {
                self.commit(token, state);
            })
            .await;

        if self.is_current(token) {
            Some(state)
        } else {
            tracing::debug!(page = %page_key, "Discarding superseded render");
            None
        }
    }

    /// Detach the view; in-flight requests will not update it.
    pub fn unmount(&self) {
        let mut displayed = self.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        *displayed = RenderState::Idle;
    }

    /// Currently displayed state.
    pub fn displayed(&self) -> RenderState {
        self.lock().clone()
    }

    fn is_current(&self, token: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == token
    }

    fn commit(&self, token: u64, state: &RenderState) {
        let mut displayed = self.lock();
        if self.is_current(token) {
            *displayed = state.clone();
        }
    }

    fn lock(&self) -> MutexGuard<'_, RenderState> {
        self.displayed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc;

    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tessera_content::{Page, Section, SectionContent, SiteContent};
    use tessera_library::{LibraryLoadError, LibraryLoader, ModuleSource};

    use super::*;
    use crate::source::Preloaded;

    /// Library source that blocks until released.
    struct GatedModule {
        gate: Mutex<mpsc::Receiver<()>>,
        calls: Arc<AtomicUsize>,
    }

    impl ModuleSource for GatedModule {
        fn fetch(&self) -> Result<Value, LibraryLoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate.lock().unwrap().recv().unwrap();
            Ok(json!({ "Hero": "<h1>{{ title }}</h1>" }))
        }

        fn location(&self) -> String {
            "gated".to_owned()
        }
    }

    fn page(title: &str) -> Page {
        Page::from_sections(vec![Section {
            id: "1".to_owned(),
            component: "Hero".to_owned(),
            props: json!({ "title": title }).as_object().cloned().unwrap(),
            content: SectionContent::new(""),
        }])
    }

    fn gated_view() -> (PageView, mpsc::Sender<()>, Arc<AtomicUsize>) {
        let (release, gate) = mpsc::channel();
        let calls = Arc::new(AtomicUsize::new(0));
        let module = GatedModule {
            gate: Mutex::new(gate),
            calls: Arc::clone(&calls),
        };
        let site: SiteContent = [("home".to_owned(), page("Home")), ("index".to_owned(), page("Index"))]
            .into_iter()
            .collect();
        let renderer = PageRenderer::new(
            Arc::new(LibraryLoader::new(module)),
            Arc::new(Preloaded(Arc::new(site))),
        );
        (PageView::new(Arc::new(renderer)), release, calls)
    }

    async fn release_when_fetching(release: mpsc::Sender<()>, calls: &AtomicUsize) {
        loop {
            tokio::task::yield_now().await;
            if calls.load(Ordering::SeqCst) > 0 {
                break;
            }
        }
        release.send(()).unwrap();
    }

    #[tokio::test]
    async fn test_navigate_commits_result() {
        let (view, release, calls) = gated_view();
        assert_eq!(view.displayed(), RenderState::Idle);

        let (state, ()) = tokio::join!(view.navigate("home"), release_when_fetching(release, &calls));

        let state = state.unwrap();
        assert_eq!(view.displayed(), state);
        assert_eq!(state.to_html(), "<div class=\"page\"><h1>Home</h1></div>");
    }

    #[tokio::test]
    async fn test_superseded_navigation_is_discarded() {
        let (view, release, calls) = gated_view();

        let (first, second, ()) = tokio::join!(
            view.navigate("home"),
            view.navigate("index"),
            release_when_fetching(release, &calls)
        );

        assert_eq!(first, None);
        let second = second.unwrap();
        assert_eq!(second.to_html(), "<div class=\"page\"><h1>Index</h1></div>");
        assert_eq!(view.displayed(), second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_pending_state_is_displayed() {
        let (view, release, calls) = gated_view();

        let observer = async {
            while calls.load(Ordering::SeqCst) == 0 {
                tokio::task::yield_now().await;
            }
            let pending = view.displayed();
            release.send(()).unwrap();
            pending
        };
        let (state, pending) = tokio::join!(view.navigate("home"), observer);

        assert_eq!(pending, RenderState::LibraryPending);
        assert!(matches!(state, Some(RenderState::ContentReady(_))));
    }

    #[tokio::test]
    async fn test_unmount_drops_in_flight_result() {
        let (view, release, calls) = gated_view();

        let unmounter = async {
            while calls.load(Ordering::SeqCst) == 0 {
                tokio::task::yield_now().await;
            }
            view.unmount();
            release.send(()).unwrap();
        };
        let (state, ()) = tokio::join!(view.navigate("home"), unmounter);

        assert_eq!(state, None);
        assert_eq!(view.displayed(), RenderState::Idle);
    }
}
