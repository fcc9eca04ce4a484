use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, StatusCode, Url,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;

use crate::{
    error::ApiError,
    model::{ClearAck, ErrorBody, HistoryEntry, HistoryPage, WeatherSnapshot},
};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Upper bound for any single backend call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const WEATHER_FALLBACK: &str = "Failed to fetch weather data";
const HISTORY_FALLBACK: &str = "Failed to fetch history";
const CLEAR_FALLBACK: &str = "Failed to clear history";

/// The three calls the dashboard makes against the weather backend.
///
/// Every failure comes back as one of the [`ApiError`] kinds; implementors
/// must not leak transport details.
#[async_trait]
pub trait WeatherBackend: Send + Sync + Debug {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherSnapshot, ApiError>;

    /// Most recent first, at most `limit` entries. `limit` must be ≥ 1.
    async fn fetch_history(&self, limit: u32) -> Result<Vec<HistoryEntry>, ApiError>;

    async fn clear_history(&self) -> Result<ClearAck, ApiError>;
}

/// HTTP implementation of [`WeatherBackend`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    timeout: Duration,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub(crate) fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| {
                tracing::error!(error = %err, "Failed to build HTTP client");
                ApiError::request_failed()
            })?;

        Ok(Self { base_url: base_url.into(), timeout, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins by concatenation so a base URL with a path prefix keeps it.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let raw = format!("{}{}", self.base_url.trim_end_matches('/'), path);

        let url = Url::parse(&raw).map_err(|err| {
            tracing::debug!(url = %raw, error = %err, "Invalid backend URL");
            ApiError::request_failed()
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => {
                tracing::debug!(url = %raw, scheme = other, "Unsupported URL scheme");
                Err(ApiError::request_failed())
            }
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let res = request.send().await.map_err(transport_error)?;

        let status = res.status();
        let body = res.text().await.map_err(transport_error)?;

        if !status.is_success() {
            let message = server_message(&body).unwrap_or_else(|| fallback.to_string());
            tracing::debug!(%status, %message, "Backend returned an error");

            return Err(if status == StatusCode::NOT_FOUND {
                ApiError::NotFound(message)
            } else {
                ApiError::Server { status: status.as_u16(), message }
            });
        }

        serde_json::from_str(&body).map_err(|err| {
            tracing::warn!(
                %status,
                error = %err,
                body = %truncate_body(&body),
                "Failed to parse backend response"
            );
            ApiError::Server { status: status.as_u16(), message: fallback.to_string() }
        })
    }
}

#[async_trait]
impl WeatherBackend for ApiClient {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherSnapshot, ApiError> {
        let url = self.endpoint("/api/weather")?;
        tracing::debug!(city, "Fetching weather");

        let request = self.http.get(url).query(&[("city", city)]);
        self.execute(request, WEATHER_FALLBACK).await
    }

    async fn fetch_history(&self, limit: u32) -> Result<Vec<HistoryEntry>, ApiError> {
        if limit == 0 {
            return Err(ApiError::Request("History limit must be at least 1".to_string()));
        }

        let url = self.endpoint("/api/history")?;
        tracing::debug!(limit, "Fetching history");

        let request = self.http.get(url).query(&[("limit", limit)]);
        let page: HistoryPage = self.execute(request, HISTORY_FALLBACK).await?;
        Ok(page.history)
    }

    async fn clear_history(&self) -> Result<ClearAck, ApiError> {
        let url = self.endpoint("/api/history")?;
        tracing::debug!("Clearing history");

        let request = self.http.delete(url);
        self.execute(request, CLEAR_FALLBACK).await
    }
}

/// A reqwest error means no usable response arrived, unless the request
/// itself could not be built.
fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_builder() {
        tracing::debug!(error = %err, "Failed to build request");
        ApiError::request_failed()
    } else {
        tracing::debug!(error = %err, timeout = err.is_timeout(), "No response from backend");
        ApiError::no_response()
    }
}

fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|msg| !msg.trim().is_empty())
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
