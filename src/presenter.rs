use crate::catalog;
use crate::data_structures::{SharedTracker, SiteContent};
use crate::render;
use crate::tracker::{self, TrackerClient};
use crate::utils::kv_store::KeyValueStore;
use crate::view::View;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Fixed key the selected view is persisted under.
pub const VIEW_KEY: &str = "atlantic-walk.page";

/// Seconds between browser reloads while tracker data is loading.
pub const LOADING_REFRESH_SECS: u32 = 2;

/// Owns the selected view and everything needed to render it.
pub struct Presenter {
    current: Mutex<View>,
    store: Arc<dyn KeyValueStore>,
    tracker: SharedTracker,
    // Tracker fetches started but not yet finished
    fetches_in_flight: Arc<AtomicUsize>,
    client: TrackerClient,
    content: Arc<SiteContent>,
    reports_dir: PathBuf,
}

impl Presenter {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        client: TrackerClient,
        content: Arc<SiteContent>,
        reports_dir: PathBuf,
    ) -> Self {
        Self {
            current: Mutex::new(View::default()),
            store,
            tracker: SharedTracker::default(),
            fetches_in_flight: Arc::new(AtomicUsize::new(0)),
            client,
            content,
            reports_dir,
        }
    }

    pub fn content(&self) -> &SiteContent {
        &self.content
    }

    pub fn reports_dir(&self) -> &PathBuf {
        &self.reports_dir
    }

    pub fn tracker(&self) -> SharedTracker {
        self.tracker.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.fetches_in_flight.load(Ordering::SeqCst) > 0
    }

    pub async fn current(&self) -> View {
        *self.current.lock().await
    }

    /// Restore the last persisted view, falling back to home.
    ///
    /// Returns the tracker fetch handle when the restored view is performance.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> Option<JoinHandle<()>> {
        let view = match self.store.get(VIEW_KEY) {
            Some(stored) => match stored.parse::<View>() {
                Ok(view) => view,
                Err(e) => {
                    warn!(error = %e, "Ignoring persisted view");
                    View::default()
                }
            },
            None => View::default(),
        };

        *self.current.lock().await = view;
        info!(%view, "Restored view");
        self.enter(view)
    }

    /// Switch to `view` and persist the choice.
    ///
    /// Returns the tracker fetch handle when entering performance.
    #[instrument(skip(self))]
    pub async fn select(&self, view: View) -> Option<JoinHandle<()>> {
        let previous = std::mem::replace(&mut *self.current.lock().await, view);
        debug!(%previous, "View selected");

        if let Err(e) = self.store.set(VIEW_KEY, view.as_str()) {
            warn!(error = ?e, "Failed to persist selected view");
        }

        self.enter(view)
    }

    // Entering performance starts a detached fetch; a late result still lands
    fn enter(&self, view: View) -> Option<JoinHandle<()>> {
        match view {
            View::Performance => {
                self.fetches_in_flight.fetch_add(1, Ordering::SeqCst);
                let in_flight = self.fetches_in_flight.clone();
                let refresh = tracker::refresh(self.client.clone(), self.tracker.clone());
                Some(tokio::spawn(async move {
                    refresh.await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                }))
            }
            _ => None,
        }
    }

    /// Render the full page for the current view.
    pub async fn render(&self) -> String {
        let view = self.current().await;
        // Checked before reading the series so a finished fetch is always visible
        let refresh_secs = (view == View::Performance && self.is_loading()).then_some(LOADING_REFRESH_SECS);
        let body = self.render_view(view).await;
        render::page(&self.content, view, &body, refresh_secs)
    }

    pub async fn render_view(&self, view: View) -> String {
        match view {
            View::Home => render::home(&self.content),
            View::Research => {
                let items = catalog::build_report_catalog(&self.reports_dir, &self.content.reports);
                render::research(&items, &self.content.models)
            }
            View::Models => render::models(&self.content.models),
            View::Performance => render::performance(&self.tracker.lock().await),
            View::About => render::about(&self.content),
            View::Contact => render::contact(&self.content),
        }
    }
}
