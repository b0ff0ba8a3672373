//! PostgREST-style HTTP client for the hosted task store.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use taskboard_proto::rest::{
    API_KEY_HEADER, ApiErrorBody, ORDER_NEWEST_FIRST, PGRST_OBJECT, PREFER_MINIMAL,
    PREFER_REPRESENTATION, SELECT_COLUMNS, StatusPatch, eq_filter, tasks_path,
};
use taskboard_proto::task::{NewTask, Task, TaskId, TaskStatus};

use super::{StoreError, TaskStore};

/// Connection settings for [`RestStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    pub base_url: String,
    /// Optional API key, sent as `apikey` and as a bearer token.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

/// Task store reached over HTTP.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: reqwest::Client,
    tasks_url: String,
}

impl RestStore {
    /// Builds a client for the given project.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the API key is not a valid
    /// header value or the HTTP client cannot be constructed.
    pub fn new(config: &RestConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            let invalid = |_| StoreError::Unavailable("API key is not a valid header value".into());
            headers.insert(API_KEY_HEADER, HeaderValue::from_str(key).map_err(invalid)?);
            headers.insert(
                reqwest::header::AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {key}")).map_err(invalid)?,
            );
        }
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            tasks_url: format!("{}{}", config.base_url.trim_end_matches('/'), tasks_path()),
        })
    }

    /// Full URL of the tasks endpoint.
    #[must_use]
    pub fn tasks_url(&self) -> &str {
        &self.tasks_url
    }
}

/// Maps a non-success response to a [`StoreError`].
///
/// Uses the body's `message` when it parses as an error body, otherwise the
/// HTTP status line.
fn rejection(status: StatusCode, body: &str) -> StoreError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| status_line(status));
    StoreError::Rejected {
        status: status.as_u16(),
        message,
    }
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

fn unavailable(err: &reqwest::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

/// Reads the body and fails on a non-success status.
async fn checked_body(resp: reqwest::Response) -> Result<String, StoreError> {
    let status = resp.status();
    let body = resp.text().await.map_err(|e| unavailable(&e))?;
    if status.is_success() {
        Ok(body)
    } else {
        tracing::warn!(status = status.as_u16(), "store rejected request");
        Err(rejection(status, &body))
    }
}

impl TaskStore for RestStore {
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let resp = self
            .client
            .get(&self.tasks_url)
            .query(&[("select", SELECT_COLUMNS), ("order", ORDER_NEWEST_FIRST)])
            .send()
            .await
            .map_err(|e| unavailable(&e))?;
        let body = checked_body(resp).await?;
        let tasks: Vec<Task> =
            serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))?;
        tracing::debug!(count = tasks.len(), "fetched tasks");
        Ok(tasks)
    }

    async fn create_task(&self, task: NewTask) -> Result<Task, StoreError> {
        let resp = self
            .client
            .post(&self.tasks_url)
            .query(&[("select", SELECT_COLUMNS)])
            .header("Prefer", PREFER_REPRESENTATION)
            .header(ACCEPT, PGRST_OBJECT)
            .json(&task)
            .send()
            .await
            .map_err(|e| unavailable(&e))?;
        let body = checked_body(resp).await?;
        let row: Task =
            serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))?;
        tracing::debug!(task_id = %row.id, "created task");
        Ok(row)
    }

    async fn update_task_status(&self, id: &TaskId, status: TaskStatus) -> Result<(), StoreError> {
        let resp = self
            .client
            .patch(&self.tasks_url)
            .query(&[("id", eq_filter(id))])
            .header("Prefer", PREFER_MINIMAL)
            .json(&StatusPatch { status })
            .send()
            .await
            .map_err(|e| unavailable(&e))?;
        checked_body(resp).await?;
        tracing::debug!(task_id = %id, %status, "updated task status");
        Ok(())
    }
}
