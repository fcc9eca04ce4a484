//! Local mirror of the server-side search history.

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use tokio::sync::watch;

use crate::{
    client::WeatherBackend,
    error::{ApiError, HistoryError},
    model::HistoryEntry,
};

pub const DEFAULT_HISTORY_LIMIT: u32 = 10;

pub const CLEAR_CONFIRMATION_PROMPT: &str = "Are you sure you want to clear all search history?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared { deleted: u64 },
    /// The user answered "no" at the confirmation prompt.
    Declined,
}

/// Holds the recent-search list shown next to the current result.
///
/// The list is never edited locally: it is replaced by whatever the backend
/// returns on [`refresh`](Self::refresh), or emptied after a successful
/// [`clear`](Self::clear).
#[derive(Debug)]
pub struct HistoryStore {
    backend: Arc<dyn WeatherBackend>,
    limit: u32,
    entries: watch::Sender<Vec<HistoryEntry>>,
    /// Ticket of the most recently issued refresh; bumped again by a clear.
    issued: AtomicU64,
    clearing: AtomicBool,
}

impl HistoryStore {
    pub fn new(backend: Arc<dyn WeatherBackend>, limit: u32) -> Self {
        let (entries, _) = watch::channel(Vec::new());
        Self {
            backend,
            limit: limit.max(1),
            entries,
            issued: AtomicU64::new(0),
            clearing: AtomicBool::new(false),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<HistoryEntry>> {
        self.entries.subscribe()
    }

    /// `true` while a clear is waiting on the backend.
    pub fn is_clearing(&self) -> bool {
        self.clearing.load(Ordering::SeqCst)
    }

    pub async fn refresh(&self) -> Result<usize, ApiError> {
        self.refresh_with_limit(self.limit).await
    }

    /// Replaces the list with the backend's latest `limit` entries and
    /// returns how many were applied.
    ///
    /// On failure the current list stays as it is. A response that arrives
    /// after a newer refresh or a clear was issued is dropped and counts as 0.
    pub async fn refresh_with_limit(&self, limit: u32) -> Result<usize, ApiError> {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        let fetched = match self.backend.fetch_history(limit).await {
            Ok(fetched) => fetched,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to fetch history; keeping current list");
                return Err(err);
            }
        };

        let count = fetched.len();
        let applied = self.entries.send_if_modified(|current| {
            if self.issued.load(Ordering::SeqCst) != ticket {
                return false;
            }
            *current = fetched;
            true
        });

        if !applied {
            tracing::debug!(ticket, "Dropping stale history response");
            return Ok(0);
        }

        Ok(count)
    }

    /// Clears the history on the backend after `confirm` approves
    /// [`CLEAR_CONFIRMATION_PROMPT`], then empties the local list.
    ///
    /// The local list is only touched once the backend confirms. While a
    /// clear is pending further calls fail with
    /// [`HistoryError::ClearPending`] without prompting.
    pub async fn clear<F>(&self, confirm: F) -> Result<ClearOutcome, HistoryError>
    where
        F: FnOnce(&str) -> bool,
    {
        if self.clearing.swap(true, Ordering::SeqCst) {
            return Err(HistoryError::ClearPending);
        }
        let _pending = PendingClear(&self.clearing);

        if !confirm(CLEAR_CONFIRMATION_PROMPT) {
            return Ok(ClearOutcome::Declined);
        }

        match self.backend.clear_history().await {
            Ok(ack) => {
                self.issued.fetch_add(1, Ordering::SeqCst);
                self.entries.send_modify(Vec::clear);
                tracing::info!(deleted = ack.deleted_count, "Search history cleared");
                Ok(ClearOutcome::Cleared { deleted: ack.deleted_count })
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to clear history");
                Err(HistoryError::Clear(err))
            }
        }
    }
}

/// Releases the clear flag on every exit path, including cancellation.
struct PendingClear<'a>(&'a AtomicBool);

impl Drop for PendingClear<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
