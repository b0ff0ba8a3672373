//! Data access layer for tasks.
//!
//! Defines the [`TaskStore`] trait the dashboard talks to, with two
//! implementations:
//! - [`rest::RestStore`]: PostgREST-style HTTP client for the hosted store.
//! - [`memory::InMemoryStore`]: process-local table for offline demo runs and tests.

pub mod memory;
pub mod rest;

use std::future::Future;

use taskboard_proto::task::{NewTask, Task, TaskId, TaskStatus};

/// Errors reported by a [`TaskStore`].
///
/// The `Display` form of every variant is the bare message from the
/// backend, which is what the dashboard shows to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The request never produced a response (connect, DNS, timeout).
    #[error("{0}")]
    Unavailable(String),

    /// The store answered with a non-success status.
    #[error("{message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or the status line.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("{0}")]
    Decode(String),

    /// The store refused the row (constraint violation, bad input).
    #[error("{0}")]
    Invalid(String),
}

impl StoreError {
    /// User-facing message text.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Async collaborator the task list and form read from and write to.
///
/// Implementations must be shareable across tokio tasks: the store worker
/// runs every request as its own task against one `Arc<impl TaskStore>`.
pub trait TaskStore: Send + Sync {
    /// Fetch every task, newest `created_at` first.
    fn list_tasks(&self) -> impl Future<Output = Result<Vec<Task>, StoreError>> + Send;

    /// Insert a task and return the stored row (with `id` and `created_at`).
    fn create_task(&self, task: NewTask) -> impl Future<Output = Result<Task, StoreError>> + Send;

    /// Set the status of a single task.
    ///
    /// Updating an id that matches no row is not an error.
    fn update_task_status(
        &self,
        id: &TaskId,
        status: TaskStatus,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
