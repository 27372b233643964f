//! HTTP client for the upstream calendar events service.
//!
//! The service answers `GET /events/{YYYY-MM-DD}` with an envelope:
//!
//! ```json
//! {"success": true, "date": "2025-08-18", "events": [ ... ]}
//! {"success": false, "error": "Failed to retrieve events: ..."}
//! ```
//!
//! Failures are reported with a 4xx/5xx status and the same envelope.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use eventblocks_core::EventRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Where the upstream service listens by default.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Errors from fetching events.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The configured API URL is unusable.
    #[error("invalid API URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Connection failed, timed out, or the body could not be read.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("API request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// The body was not the expected JSON.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The service reported `success: false`.
    #[error("API returned error: {0}")]
    Upstream(String),

    /// A local events file could not be read.
    #[error("failed to read {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },
}

/// Response envelope of the events endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub events: Vec<EventRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl EventsResponse {
    /// Returns the events, or the upstream error when `success` is false.
    pub fn into_events(self) -> Result<Vec<EventRecord>, FetchError> {
        if self.success {
            Ok(self.events)
        } else {
            Err(FetchError::Upstream(
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

/// Connection settings for [`EventsApi`].
#[derive(Debug, Clone)]
pub struct EventsApiConfig {
    /// Base URL of the service.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Meeting service base URLs sent as the `meeting_urls` query parameter.
    pub meeting_base_urls: Vec<String>,
}

impl Default for EventsApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl EventsApiConfig {
    /// Creates a config for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            meeting_base_urls: Vec::new(),
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the meeting base URLs forwarded to the service.
    #[must_use]
    pub fn with_meeting_base_urls(mut self, urls: Vec<String>) -> Self {
        self.meeting_base_urls = urls;
        self
    }
}

/// Client for the upstream events service.
#[derive(Debug, Clone)]
pub struct EventsApi {
    http_client: reqwest::Client,
    base_url: Url,
    meeting_urls: Option<String>,
}

impl EventsApi {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Fails if the base URL does not parse or cannot take a path.
    pub fn new(config: EventsApiConfig) -> Result<Self, FetchError> {
        let base_url = Url::parse(config.base_url.trim()).map_err(|e| FetchError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl {
                url: config.base_url,
                reason: "URL cannot have a path".to_string(),
            });
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Network(format!("failed to create HTTP client: {}", e)))?;

        let meeting_urls = if config.meeting_base_urls.is_empty() {
            None
        } else {
            Some(config.meeting_base_urls.join(","))
        };

        Ok(Self {
            http_client,
            base_url,
            meeting_urls,
        })
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetches the events of one day.
    pub async fn fetch_events(&self, date: NaiveDate) -> Result<Vec<EventRecord>, FetchError> {
        let mut url = self.endpoint(&["events", &date.format("%Y-%m-%d").to_string()])?;
        if let Some(ref meeting_urls) = self.meeting_urls {
            url.query_pairs_mut().append_pair("meeting_urls", meeting_urls);
        }

        debug!(url = %url, "Fetching events");
        let body = self.get(url).await?;

        let envelope: EventsResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::Decode(format!("failed to parse events: {}", e)))?;
        let events = envelope.into_events()?;

        debug!(date = %date, count = events.len(), "Fetched events");
        Ok(events)
    }

    /// Checks that the service is up.
    pub async fn health(&self) -> Result<HealthStatus, FetchError> {
        let url = self.endpoint(&["health"])?;
        let body = self.get(url).await?;
        serde_json::from_str(&body)
            .map_err(|e| FetchError::Decode(format!("failed to parse health status: {}", e)))
    }

    /// Appends path segments to the base URL, tolerating a trailing slash.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot have a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a GET and returns the body of a successful response.
    async fn get(&self, url: Url) -> Result<String, FetchError> {
        let response = self.http_client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Network("request timeout".to_string())
            } else if e.is_connect() {
                FetchError::Network(format!("connection failed: {}", e))
            } else {
                FetchError::Network(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<EventsResponse>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }
}
