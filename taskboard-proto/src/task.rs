//! Task model shared by the dashboard client and the development server.
//!
//! A [`Task`] is the persisted row; a [`NewTask`] is the insert payload the
//! client sends. Identifiers and creation times are always assigned by the
//! store, never by the client.

use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a task, assigned by the store (UUID v7).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Error returned when a string is not one of the three status values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task status: {0}")]
pub struct ParseStatusError(pub String);

/// Lifecycle status of a task.
///
/// There is no transition graph: any status may change to any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet.
    #[default]
    Pending,
    /// Actively being worked on.
    InProgress,
    /// Done.
    Complete,
}

impl TaskStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Complete];

    /// Wire name of the status (`pending`, `in_progress`, `complete`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Complete => "complete",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In progress",
            Self::Complete => "Complete",
        }
    }

    /// The next status in display order, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Pending => Self::InProgress,
            Self::InProgress => Self::Complete,
            Self::Complete => Self::Pending,
        }
    }

    /// The previous status in display order, wrapping around.
    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::Pending => Self::Complete,
            Self::InProgress => Self::Pending,
            Self::Complete => Self::InProgress,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "complete" => Ok(Self::Complete),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// A persisted task row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identifier.
    pub id: TaskId,
    /// Non-empty title.
    pub title: String,
    /// Optional description (`None` is distinct from an empty string).
    pub description: Option<String>,
    /// Current status.
    pub status: TaskStatus,
    /// Optional due date, normalized to midnight UTC of the calendar date.
    #[serde(default, with = "wire_time::optional")]
    pub due_date: Option<DateTime<Utc>>,
    /// Store-assigned creation time; the list sort key (newest first).
    #[serde(with = "wire_time::required")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Whether the task is overdue on the given day.
    ///
    /// Only the date portion of `due_date` is compared: a task is overdue
    /// when it is not complete and its due date is strictly before `today`.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Complete
            && self.due_date.is_some_and(|due| due.date_naive() < today)
    }
}

/// Insert payload for a new task.
///
/// Serializes to `{title, description, status, due_date}` with absent
/// values as JSON `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Trimmed, non-empty title.
    pub title: String,
    /// Trimmed description, `None` when empty.
    #[serde(default)]
    pub description: Option<String>,
    /// Initial status.
    #[serde(default)]
    pub status: TaskStatus,
    /// Due date as a normalized date-time.
    #[serde(default, with = "wire_time::optional")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Converts a calendar date into the normalized due-date instant
/// (midnight UTC).
#[must_use]
pub fn due_date_from(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Formats an instant the way the client puts it on the wire
/// (`2025-01-01T00:00:00.000Z`).
#[must_use]
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Parses a timestamp as returned by the store.
///
/// Accepts RFC 3339 (`2025-01-01T00:00:00+00:00`), a timestamp without an
/// offset (read as UTC), or a bare calendar date (midnight UTC).
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(due_date_from)
}

/// Creation time for a new row: `now`, unless the clock has not moved past
/// `previous`, in which case one millisecond after it. Keeps `created_at`
/// strictly increasing so the newest-first order is total.
#[must_use]
pub fn next_created_at(previous: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    match previous {
        Some(last) if now <= last => last + Duration::milliseconds(1),
        _ => now,
    }
}

/// Serde adapters for store timestamps.
mod wire_time {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::{format_timestamp, parse_timestamp};

    pub mod required {
        use super::{DateTime, Deserialize, Deserializer, Error, Serializer, Utc};

        pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, ser: S) -> Result<S::Ok, S::Error> {
            ser.serialize_str(&super::format_timestamp(ts))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<DateTime<Utc>, D::Error> {
            let raw = String::deserialize(de)?;
            super::parse_timestamp(&raw)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}")))
        }
    }

    pub mod optional {
        use super::{DateTime, Deserialize, Deserializer, Error, Serializer, Utc};

        #[allow(clippy::ref_option)]
        pub fn serialize<S: Serializer>(
            ts: &Option<DateTime<Utc>>,
            ser: S,
        ) -> Result<S::Ok, S::Error> {
            match ts {
                Some(ts) => ser.serialize_str(&super::format_timestamp(ts)),
                None => ser.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            de: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let Some(raw) = Option::<String>::deserialize(de)? else {
                return Ok(None);
            };
            super::parse_timestamp(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}")))
        }
    }
}
