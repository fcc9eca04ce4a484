use thiserror::Error;

/// Message shown when the backend could not be reached at all.
pub const NO_RESPONSE_MESSAGE: &str = "No response from server. Please check your connection.";

/// Message shown when the request could not even be built locally.
pub const REQUEST_FAILED_MESSAGE: &str = "Failed to make request";

/// Message shown when a search is submitted with an empty (or blank) query.
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a city name";

/// The five user-visible failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Server,
    Network,
    Request,
}

/// Normalized failure of a single backend call.
///
/// `Display` yields only the human-readable message, so callers can put it
/// straight into an error banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The backend answered 404, e.g. an unknown city.
    #[error("{0}")]
    NotFound(String),

    /// The backend answered with any other non-2xx status, or with a body
    /// that could not be decoded.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// No response was received (connect failure, timeout, dropped body).
    #[error("{0}")]
    Network(String),

    /// The request could not be constructed locally.
    #[error("{0}")]
    Request(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Server { .. } => ErrorKind::Server,
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::Request(_) => ErrorKind::Request,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::NotFound(msg) | ApiError::Network(msg) | ApiError::Request(msg) => msg,
            ApiError::Server { message, .. } => message,
        }
    }

    pub(crate) fn no_response() -> Self {
        ApiError::Network(NO_RESPONSE_MESSAGE.to_string())
    }

    pub(crate) fn request_failed() -> Self {
        ApiError::Request(REQUEST_FAILED_MESSAGE.to_string())
    }
}

/// Outcome of a rejected or failed search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("Please enter a city name")]
    EmptyQuery,

    /// Another search is still loading; the new one was not started.
    #[error("A search is already in progress")]
    Busy,

    /// The controller was reset while this search was in flight, so its
    /// result was discarded.
    #[error("Search was superseded")]
    Superseded,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SearchError {
    /// Category of the failure. `Busy` and `Superseded` are not failures the
    /// user caused, so they report as `Validation` alongside `EmptyQuery`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::EmptyQuery | SearchError::Busy | SearchError::Superseded => {
                ErrorKind::Validation
            }
            SearchError::Api(err) => err.kind(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("Clearing history is already in progress")]
    ClearPending,

    #[error("Failed to clear history. Please try again.")]
    Clear(#[source] ApiError),
}
