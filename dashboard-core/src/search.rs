//! Query lifecycle: validate, fetch, publish, then sync history.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::watch;

use crate::{
    client::WeatherBackend,
    error::{EMPTY_QUERY_MESSAGE, SearchError},
    history::HistoryStore,
    model::WeatherSnapshot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Loading,
    Success,
    Failed,
}

/// Everything the search panel renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// Trimmed query of the latest submission.
    pub query: String,
    pub phase: SearchPhase,
    pub error: Option<String>,
    /// Last successful result. Kept while a new search loads, dropped on
    /// failure.
    pub snapshot: Option<WeatherSnapshot>,
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        self.phase == SearchPhase::Loading
    }

    /// Result to show; hidden while a search is loading.
    pub fn visible_snapshot(&self) -> Option<&WeatherSnapshot> {
        if self.is_loading() { None } else { self.snapshot.as_ref() }
    }

    /// Error banner text; hidden while a search is loading.
    pub fn visible_error(&self) -> Option<&str> {
        if self.is_loading() { None } else { self.error.as_deref() }
    }
}

/// Drives `Idle → Loading → {Success, Failed}` for city searches.
///
/// Only one search runs at a time: a submit while loading is rejected with
/// [`SearchError::Busy`]. Each successful search triggers one history
/// refresh, whose outcome never affects the search state.
#[derive(Debug)]
pub struct SearchController {
    backend: Arc<dyn WeatherBackend>,
    history: Arc<HistoryStore>,
    state: watch::Sender<SearchState>,
    issued: AtomicU64,
}

impl SearchController {
    pub fn new(backend: Arc<dyn WeatherBackend>, history: Arc<HistoryStore>) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self { backend, history, state, issued: AtomicU64::new(0) }
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub async fn submit(&self, raw_query: &str) -> Result<WeatherSnapshot, SearchError> {
        let query = raw_query.trim();
        let ticket = self.begin(query)?;

        tracing::debug!(query, ticket, "Search started");
        let outcome = self.backend.fetch_weather(query).await;

        let mut applied = false;
        self.state.send_if_modified(|state| {
            if self.issued.load(Ordering::SeqCst) != ticket {
                return false;
            }
            match &outcome {
                Ok(snapshot) => {
                    state.phase = SearchPhase::Success;
                    state.error = None;
                    state.snapshot = Some(snapshot.clone());
                }
                Err(err) => {
                    state.phase = SearchPhase::Failed;
                    state.error = Some(err.to_string());
                    state.snapshot = None;
                }
            }
            applied = true;
            true
        });

        if !applied {
            tracing::debug!(query, ticket, "Discarding superseded search result");
            return Err(SearchError::Superseded);
        }

        match outcome {
            Ok(snapshot) => {
                if let Err(err) = self.history.refresh().await {
                    tracing::debug!(error = %err, "History refresh after search failed");
                }
                Ok(snapshot)
            }
            Err(err) => {
                tracing::debug!(query, error = %err, "Search failed");
                Err(err.into())
            }
        }
    }

    /// Re-searches a history entry by its city label, so the result shows
    /// current conditions rather than the stored ones.
    pub async fn select_history_entry(&self, city_name: &str) -> Result<WeatherSnapshot, SearchError> {
        self.submit(city_name).await
    }

    /// Back to `Idle` with nothing displayed. A search still in flight is
    /// ignored when it completes.
    pub fn reset(&self) {
        self.issued.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(SearchState::default());
    }

    /// Validates and moves to `Loading`, returning the new ticket.
    fn begin(&self, query: &str) -> Result<u64, SearchError> {
        let mut result = Err(SearchError::Busy);

        self.state.send_if_modified(|state| {
            if state.is_loading() {
                return false;
            }

            state.query = query.to_string();
            if query.is_empty() {
                state.phase = SearchPhase::Failed;
                state.error = Some(EMPTY_QUERY_MESSAGE.to_string());
                state.snapshot = None;
                result = Err(SearchError::EmptyQuery);
            } else {
                state.phase = SearchPhase::Loading;
                state.error = None;
                result = Ok(self.issued.fetch_add(1, Ordering::SeqCst) + 1);
            }
            true
        });

        result
    }
}
