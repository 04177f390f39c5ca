//! Debounced class search with stale-result suppression.
//!
//! Every keystroke calls [`ClassSearcher::on_input`], which takes a
//! fresh sequence ticket and spawns a task that sleeps out the debounce
//! window before touching the network.  The ticket is re-checked after
//! the sleep (so superseded queries never issue a request at all) and
//! again when the response resolves (so a slow response for an old
//! query is dropped rather than displayed).  Nothing is aborted at the
//! transport level.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use notesnap_client::seams::ClassDirectory;
use notesnap_core::class::Class;
use notesnap_core::search::{normalize_query, SearchSequencer, SEARCH_DEBOUNCE};

/// What the search screen renders.
#[derive(Debug, Clone, Default)]
pub struct SearchView {
    /// The query whose results are displayed.
    pub query: String,
    pub results: Vec<Class>,
    /// Latest error for this screen, replacing any prior one.
    pub error: Option<String>,
    /// Whether a request is outstanding for the current query.
    pub loading: bool,
}

/// Search-as-you-type coordinator for the class directory.
#[derive(Clone)]
pub struct ClassSearcher {
    directory: Arc<dyn ClassDirectory>,
    sequencer: Arc<SearchSequencer>,
    view: Arc<RwLock<SearchView>>,
    cancel: CancellationToken,
}

impl ClassSearcher {
    pub fn new(directory: Arc<dyn ClassDirectory>) -> Self {
        Self {
            directory,
            sequencer: Arc::new(SearchSequencer::new()),
            view: Arc::new(RwLock::new(SearchView::default())),
            cancel: CancellationToken::new(),
        }
    }

    /// Snapshot of the current display state.
    pub async fn view(&self) -> SearchView {
        self.view.read().await.clone()
    }

    /// Flag in-flight searches as cancelled (screen departure).
    pub fn leave_screen(&self) {
        self.cancel.cancel();
    }

    /// Feed the latest raw input.
    ///
    /// An empty (or all-whitespace) query supersedes everything in
    /// flight and clears the display without a request.  Anything else
    /// is debounced and searched.
    pub async fn on_input(&self, raw: &str) {
        let Some(query) = normalize_query(raw) else {
            // Take a ticket anyway so slower in-flight queries resolve stale.
            let _ = self.sequencer.begin();
            let mut view = self.view.write().await;
            *view = SearchView::default();
            return;
        };
        let query = query.to_string();

        let ticket = self.sequencer.begin();
        {
            let mut view = self.view.write().await;
            view.loading = true;
            view.error = None;
        }

        let searcher = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(SEARCH_DEBOUNCE).await;

            // Superseded during the debounce window: no request at all.
            if !searcher.sequencer.is_current(ticket) || searcher.cancel.is_cancelled() {
                return;
            }

            tracing::debug!(query = %query, "Issuing class search");
            let outcome = searcher.directory.search_classes(&query).await;

            // Re-check at resolution: a newer query may have landed while
            // this request was in flight.
            if !searcher.sequencer.is_current(ticket) || searcher.cancel.is_cancelled() {
                tracing::debug!(query = %query, "Dropping stale search result");
                return;
            }

            let mut view = searcher.view.write().await;
            view.query = query;
            view.loading = false;
            match outcome {
                Ok(results) => {
                    view.results = results;
                    view.error = None;
                }
                Err(e) => {
                    view.results = Vec::new();
                    view.error = Some(e.display_message());
                }
            }
        });
    }
}
