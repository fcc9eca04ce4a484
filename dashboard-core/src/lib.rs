//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - A typed client for the weather/history backend with normalized errors
//! - The search controller and the recent-searches store that it keeps in sync
//! - Pure presentation helpers (relative time labels, condition icons)
//! - Configuration handling
//!
//! It is used by `dashboard-cli`, but the controllers are front-end agnostic:
//! state is published through `tokio::sync::watch` channels.

pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod history;
pub mod model;
pub mod presentation;
pub mod search;
pub mod session;

#[cfg(test)]
mod testing;

pub use client::{ApiClient, DEFAULT_API_URL, REQUEST_TIMEOUT, WeatherBackend};
pub use config::Config;
pub use error::{ApiError, ErrorKind, HistoryError, SearchError};
pub use history::{ClearOutcome, HistoryStore};
pub use model::{ClearAck, HistoryEntry, WeatherSnapshot};
pub use presentation::{DisplayHint, Gradient, WeatherCategory};
pub use search::{SearchController, SearchPhase, SearchState};
pub use session::{Dashboard, Session};
