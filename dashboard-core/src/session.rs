use std::sync::Arc;

use anyhow::Context;

use crate::{
    client::{ApiClient, WeatherBackend},
    config::Config,
    error::{HistoryError, SearchError},
    history::{ClearOutcome, DEFAULT_HISTORY_LIMIT, HistoryStore},
    model::WeatherSnapshot,
    search::SearchController,
};

/// Shared application context handed to the controllers at construction.
#[derive(Debug, Clone)]
pub struct Session {
    backend: Arc<dyn WeatherBackend>,
    history_limit: u32,
}

impl Session {
    pub fn new(backend: Arc<dyn WeatherBackend>) -> Self {
        Self { backend, history_limit: DEFAULT_HISTORY_LIMIT }
    }

    pub fn with_history_limit(mut self, limit: u32) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    /// HTTP session against the backend named by `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_url = config.api_url();
        let client = ApiClient::new(api_url.as_str())
            .with_context(|| format!("Failed to create API client for {api_url}"))?;

        tracing::debug!(%api_url, "Session created");
        Ok(Self::new(Arc::new(client)).with_history_limit(config.history_limit()))
    }

    pub fn backend(&self) -> &Arc<dyn WeatherBackend> {
        &self.backend
    }

    pub fn history_limit(&self) -> u32 {
        self.history_limit
    }
}

/// Top-level orchestrator: owns the session, the search panel and the
/// recent-searches panel.
#[derive(Debug)]
pub struct Dashboard {
    session: Session,
    history: Arc<HistoryStore>,
    search: SearchController,
}

impl Dashboard {
    pub fn new(session: Session) -> Self {
        let history = Arc::new(HistoryStore::new(session.backend.clone(), session.history_limit));
        let search = SearchController::new(session.backend.clone(), history.clone());
        Self { session, history, search }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Initial history load. Failures leave the list empty and are only
    /// logged.
    pub async fn mount(&self) {
        if let Err(err) = self.history.refresh().await {
            tracing::debug!(error = %err, "Initial history load failed");
        }
    }

    pub async fn submit(&self, query: &str) -> Result<WeatherSnapshot, SearchError> {
        self.search.submit(query).await
    }

    pub async fn select_history_entry(&self, city_name: &str) -> Result<WeatherSnapshot, SearchError> {
        self.search.select_history_entry(city_name).await
    }

    pub async fn clear_history<F>(&self, confirm: F) -> Result<ClearOutcome, HistoryError>
    where
        F: FnOnce(&str) -> bool,
    {
        self.history.clear(confirm).await
    }
}
