//! Access to the remote pill/log store.
//!
//! The store is the only source of truth; everything in this crate mutates it
//! through [`PillStore`] and mirrors the response locally afterwards. The
//! HTTP implementation speaks the JSON contract below, with every date in
//! canonical `YYYY-MM-DD` form:
//!
//! | operation       | method & path                                  |
//! |-----------------|------------------------------------------------|
//! | list pills      | `GET /pills`                                   |
//! | add pill        | `POST /pills`                                  |
//! | deactivate pill | `PUT /pills/{id}`                              |
//! | list logs       | `GET /logs?startDate=...&endDate=...`          |
//! | create log      | `POST /logs`                                   |
//! | delete log      | `DELETE /logs/{pillId}/{date}`                 |

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use shared::{CreateLogRequest, CreatePillRequest, DateKey, LogEntry, Pill, UpdatePillRequest};

use crate::error::{Result, TrackerError};

/// Base URL used when none is configured.
pub const DEFAULT_STORE_URL: &str = "http://localhost:3001";

/// The six operations the remote store supports.
#[async_trait]
pub trait PillStore: Send + Sync {
    /// All pills known to the store. Callers must filter on `active`
    /// themselves; the store is not assumed to filter server-side.
    async fn list_pills(&self) -> Result<Vec<Pill>>;

    async fn create_pill(&self, request: CreatePillRequest) -> Result<Pill>;

    async fn update_pill(&self, pill_id: &str, request: UpdatePillRequest) -> Result<Pill>;

    /// Logs whose date falls within the inclusive `[start, end]` range.
    async fn list_logs(&self, start: DateKey, end: DateKey) -> Result<Vec<LogEntry>>;

    async fn create_log(&self, request: CreateLogRequest) -> Result<LogEntry>;

    async fn delete_log(&self, pill_id: &str, date: DateKey) -> Result<()>;
}

/// HTTP client for the remote store.
///
/// No client-side timeout is applied: a hung request stays pending until the
/// transport gives up, and callers that need a bound wrap the future
/// themselves.
#[derive(Debug, Clone)]
pub struct HttpPillStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPillStore {
    /// Client pointed at [`DEFAULT_STORE_URL`].
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_STORE_URL.to_string())
    }

    /// Client pointed at a custom base URL.
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder, what: &str) -> Result<reqwest::Response> {
        request
            .send()
            .await
            .map_err(|e| TrackerError::StoreUnavailable(format!("{what}: {e}")))
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response, what: &str) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| TrackerError::StoreUnavailable(format!("{what}: invalid response body: {e}")))
    }

    fn check_status(response: &reqwest::Response, what: &str) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(TrackerError::StoreUnavailable(format!(
                "{what} returned HTTP {status}"
            )))
        }
    }
}

impl Default for HttpPillStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PillStore for HttpPillStore {
    async fn list_pills(&self) -> Result<Vec<Pill>> {
        let what = "list pills";
        let response = self.send(self.client.get(self.url("/pills")), what).await?;
        Self::check_status(&response, what)?;
        Self::parse(response, what).await
    }

    async fn create_pill(&self, request: CreatePillRequest) -> Result<Pill> {
        let what = "create pill";
        let response = self
            .send(self.client.post(self.url("/pills")).json(&request), what)
            .await?;
        Self::check_status(&response, what)?;
        Self::parse(response, what).await
    }

    async fn update_pill(&self, pill_id: &str, request: UpdatePillRequest) -> Result<Pill> {
        let what = "update pill";
        let response = self
            .send(
                self.client
                    .put(self.url(&format!("/pills/{pill_id}")))
                    .json(&request),
                what,
            )
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(TrackerError::NotFound(format!("pill {pill_id}")));
        }
        Self::check_status(&response, what)?;
        Self::parse(response, what).await
    }

    async fn list_logs(&self, start: DateKey, end: DateKey) -> Result<Vec<LogEntry>> {
        let what = "list logs";
        let response = self
            .send(
                self.client.get(self.url("/logs")).query(&[
                    ("startDate", start.to_string()),
                    ("endDate", end.to_string()),
                ]),
                what,
            )
            .await?;
        Self::check_status(&response, what)?;
        Self::parse(response, what).await
    }

    async fn create_log(&self, request: CreateLogRequest) -> Result<LogEntry> {
        let what = "create log";
        let response = self
            .send(self.client.post(self.url("/logs")).json(&request), what)
            .await?;
        Self::check_status(&response, what)?;
        Self::parse(response, what).await
    }

    async fn delete_log(&self, pill_id: &str, date: DateKey) -> Result<()> {
        let what = "delete log";
        let response = self
            .send(
                self.client
                    .delete(self.url(&format!("/logs/{pill_id}/{date}"))),
                what,
            )
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(TrackerError::NotFound(format!(
                "log for pill {pill_id} on {date}"
            )));
        }
        // 2xx is all that matters; the body is ignored.
        Self::check_status(&response, what)
    }
}
