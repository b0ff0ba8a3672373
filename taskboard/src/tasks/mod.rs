//! Task dashboard components.
//!
//! [`TaskList`] holds the fetched collection, derives counts, filters by a
//! search query and applies optimistic status changes. [`TaskForm`]
//! validates and normalizes input before inserting a task. Both are plain
//! state machines: callers drive the store calls, either directly through
//! the async helpers or via the store worker in [`crate::net`].

pub mod form;
pub mod list;

pub use form::{FormField, FormFields, TaskForm};
pub use list::{LoadTicket, StatusChange, StatusUpdate, TaskList, filter_tasks, matches_query};

use taskboard_proto::task::{Task, TaskStatus};

use crate::store::StoreError;

/// Client-side input errors. These never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Title is empty after trimming.
    #[error("Title is required")]
    TitleRequired,
    /// Due date is not a `YYYY-MM-DD` calendar date.
    #[error("Due date must be a date like 2025-01-31 (got \"{0}\")")]
    InvalidDueDate(String),
}

/// Any error a dashboard component can surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    /// Input was rejected locally.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The store call failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Total and per-status task counts.
///
/// `pending + in_progress + complete == total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    /// Number of tasks.
    pub total: usize,
    /// Tasks with status `pending`.
    pub pending: usize,
    /// Tasks with status `in_progress`.
    pub in_progress: usize,
    /// Tasks with status `complete`.
    pub complete: usize,
}

impl TaskCounts {
    /// Counts a collection of tasks.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut acc, task| {
            acc.total += 1;
            match task.status {
                TaskStatus::Pending => acc.pending += 1,
                TaskStatus::InProgress => acc.in_progress += 1,
                TaskStatus::Complete => acc.complete += 1,
            }
            acc
        })
    }

    /// Count for a single status.
    #[must_use]
    pub const fn of(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Pending => self.pending,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Complete => self.complete,
        }
    }
}
