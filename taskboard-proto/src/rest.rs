//! REST wire vocabulary shared by the client and the development server.
//!
//! The store speaks a PostgREST-style interface: rows live under
//! `/rest/v1/<table>`, filters are query parameters such as `id=eq.<uuid>`,
//! and failures come back as a JSON [`ApiErrorBody`].

use serde::{Deserialize, Serialize};

use crate::task::{TaskId, TaskStatus};

/// Path prefix for table endpoints.
pub const REST_PREFIX: &str = "/rest/v1";

/// Name of the tasks table.
pub const TASKS_TABLE: &str = "tasks";

/// Columns fetched for every task row.
pub const SELECT_COLUMNS: &str = "id,title,description,status,due_date,created_at";

/// Ordering used for the task list (newest first).
pub const ORDER_NEWEST_FIRST: &str = "created_at.desc";

/// `Accept` media type asking for a single object instead of an array.
pub const PGRST_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Header carrying the project API key.
pub const API_KEY_HEADER: &str = "apikey";

/// `Prefer` value asking for the inserted row back.
pub const PREFER_REPRESENTATION: &str = "return=representation";

/// `Prefer` value asking for an empty response body.
pub const PREFER_MINIMAL: &str = "return=minimal";

/// Error code reported when a row violates a check constraint.
pub const CHECK_VIOLATION: &str = "23514";

/// Path of the tasks table endpoint, e.g. `/rest/v1/tasks`.
#[must_use]
pub fn tasks_path() -> String {
    format!("{REST_PREFIX}/{TASKS_TABLE}")
}

/// Body of a status-only update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPatch {
    /// The new status.
    pub status: TaskStatus,
}

/// Error body returned by the store for non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code (SQLSTATE or `PGRST…`).
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable message shown to the user.
    pub message: String,
    /// Extra detail, if any.
    #[serde(default)]
    pub details: Option<String>,
    /// Suggested fix, if any.
    #[serde(default)]
    pub hint: Option<String>,
}

impl ApiErrorBody {
    /// Builds an error body with a code and message.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
            details: None,
            hint: None,
        }
    }
}

/// Renders an equality filter value (`eq.<id>`).
#[must_use]
pub fn eq_filter(id: &TaskId) -> String {
    format!("eq.{id}")
}

/// Parses an `eq.<id>` filter value back into a task id.
///
/// Returns `None` for other operators or malformed ids.
#[must_use]
pub fn parse_eq_filter(value: &str) -> Option<TaskId> {
    value.strip_prefix("eq.")?.parse().ok()
}
