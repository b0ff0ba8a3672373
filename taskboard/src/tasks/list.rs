//! Task list state: load, counts, filter, optimistic status changes.
//!
//! Store calls are split into a synchronous "begin" step that returns what
//! to send and a "finish" step that applies the result. The UI loop runs the
//! request in between on its own task, so several status changes can be in
//! flight at once while the list itself is only touched from one place.

use std::sync::Arc;

use taskboard_proto::task::{Task, TaskId, TaskStatus};

use super::TaskCounts;
use crate::notify::{Notifier, Toast};
use crate::store::{StoreError, TaskStore};

/// Shown when a failed status update carries no message.
pub const STATUS_UPDATE_FALLBACK: &str = "Failed to update status";

/// Callback receiving counts whenever they change.
pub type CountsObserver = Box<dyn FnMut(TaskCounts) + Send>;

/// Tags one load request. Only the newest ticket's result is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// A status change that has been applied locally and awaits the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// Task being changed.
    pub id: TaskId,
    /// Status captured before the optimistic update.
    pub previous: TaskStatus,
    /// Requested status.
    pub next: TaskStatus,
}

impl StatusChange {
    /// Turns the store's answer into an explicit outcome.
    #[must_use]
    pub fn settle(self, result: Result<(), StoreError>) -> StatusUpdate {
        match result {
            Ok(()) => StatusUpdate::Confirmed {
                id: self.id,
                status: self.next,
            },
            Err(error) => StatusUpdate::Reverted {
                id: self.id,
                previous: self.previous,
                attempted: self.next,
                error,
            },
        }
    }

    fn toast_key(&self) -> String {
        format!("status-{}", self.id)
    }
}

/// Outcome of a status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// The store accepted the change; the optimistic state is final.
    Confirmed {
        /// Task that changed.
        id: TaskId,
        /// Its new status.
        status: TaskStatus,
    },
    /// The store rejected the change; the task goes back to `previous`.
    Reverted {
        /// Task that failed to change.
        id: TaskId,
        /// Status to restore.
        previous: TaskStatus,
        /// Status that was attempted.
        attempted: TaskStatus,
        /// Why the store refused.
        error: StoreError,
    },
}

impl StatusUpdate {
    /// Id of the task this outcome is about.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        match self {
            Self::Confirmed { id, .. } | Self::Reverted { id, .. } => id,
        }
    }
}

/// Whether `task` matches a non-blank search query.
///
/// Title or description contains the query, case-insensitively. The query
/// itself is not trimmed; only a blank query matches everything.
#[must_use]
pub fn matches_query(task: &Task, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    let q = query.to_lowercase();
    task.title.to_lowercase().contains(&q)
        || task
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&q))
}

/// Visible subsequence of `tasks` for `query`, order preserved.
#[must_use]
pub fn filter_tasks<'a>(tasks: &'a [Task], query: &str) -> Vec<&'a Task> {
    tasks.iter().filter(|t| matches_query(t, query)).collect()
}

/// In-memory view of all tasks.
pub struct TaskList {
    tasks: Vec<Task>,
    loading: bool,
    error: Option<String>,
    query: String,
    latest_ticket: u64,
    seeded: bool,
    notifier: Arc<dyn Notifier>,
    observer: Option<CountsObserver>,
    reported: Option<TaskCounts>,
}

impl std::fmt::Debug for TaskList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskList")
            .field("tasks", &self.tasks.len())
            .field("loading", &self.loading)
            .field("error", &self.error)
            .field("query", &self.query)
            .field("latest_ticket", &self.latest_ticket)
            .field("seeded", &self.seeded)
            .finish_non_exhaustive()
    }
}

impl TaskList {
    /// Creates an empty list that fetches on mount.
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            tasks: Vec::new(),
            loading: false,
            error: None,
            query: String::new(),
            latest_ticket: 0,
            seeded: false,
            notifier,
            observer: None,
            reported: None,
        }
    }

    /// Creates a list seeded with `initial` tasks.
    ///
    /// A non-empty seed disables fetching: mount and refresh keep the
    /// seeded collection.
    #[must_use]
    pub fn with_initial(notifier: Arc<dyn Notifier>, initial: Vec<Task>) -> Self {
        let seeded = !initial.is_empty();
        Self {
            tasks: initial,
            seeded,
            ..Self::new(notifier)
        }
    }

    /// Attaches the counts observer and reports the current counts to it.
    pub fn set_counts_observer(&mut self, observer: impl FnMut(TaskCounts) + Send + 'static) {
        self.observer = Some(Box::new(observer));
        self.reported = None;
        self.report_counts();
    }

    fn report_counts(&mut self) {
        let counts = self.counts();
        if self.reported == Some(counts) {
            return;
        }
        if let Some(observer) = self.observer.as_mut() {
            observer(counts);
            self.reported = Some(counts);
        }
    }

    /// Held tasks, newest first as fetched.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Current counts.
    #[must_use]
    pub fn counts(&self) -> TaskCounts {
        TaskCounts::from_tasks(&self.tasks)
    }

    /// Last surfaced error message.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a load is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether to show the loading indicator: only while loading an empty list.
    #[must_use]
    pub fn loading_indicator_visible(&self) -> bool {
        self.loading && self.tasks.is_empty()
    }

    /// Status of a held task.
    #[must_use]
    pub fn status_of(&self, id: &TaskId) -> Option<TaskStatus> {
        self.tasks.iter().find(|t| t.id == *id).map(|t| t.status)
    }

    /// Internally owned search query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replaces the internally owned search query.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Visible tasks for the controlling query, or the internal one when
    /// no controller supplies it.
    #[must_use]
    pub fn visible(&self, controlled: Option<&str>) -> Vec<&Task> {
        filter_tasks(&self.tasks, controlled.unwrap_or(&self.query))
    }

    /// Placeholder text when nothing is visible, `None` while rows are shown
    /// or the loading indicator is up.
    #[must_use]
    pub fn empty_message(&self, controlled: Option<&str>) -> Option<String> {
        if self.loading {
            return None;
        }
        if self.tasks.is_empty() {
            return Some("No tasks yet. Press 'a' to create your first task.".to_string());
        }
        let query = controlled.unwrap_or(&self.query);
        if self.visible(controlled).is_empty() {
            return Some(format!("No matching tasks for \"{query}\""));
        }
        None
    }

    /// Starts a load. Returns `None` when the list was seeded and never fetches.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.seeded {
            return None;
        }
        self.latest_ticket += 1;
        self.loading = true;
        self.error = None;
        tracing::debug!(ticket = self.latest_ticket, "loading tasks");
        Some(LoadTicket(self.latest_ticket))
    }

    /// Applies a load result. Results for superseded tickets are dropped.
    ///
    /// Returns whether the result was applied.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Task>, StoreError>,
    ) -> bool {
        if ticket.0 != self.latest_ticket {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.latest_ticket,
                "discarding stale task load"
            );
            return false;
        }
        self.loading = false;
        match result {
            Ok(tasks) => {
                tracing::info!(count = tasks.len(), "tasks loaded");
                self.tasks = tasks;
                self.report_counts();
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load tasks");
                self.error = Some(e.message());
            }
        }
        true
    }

    /// Applies `next` to task `id` optimistically.
    ///
    /// Returns `None` (nothing to send) when the id is unknown or the
    /// status is unchanged.
    pub fn begin_status_change(&mut self, id: &TaskId, next: TaskStatus) -> Option<StatusChange> {
        let task = self.tasks.iter_mut().find(|t| t.id == *id)?;
        let previous = task.status;
        if previous == next {
            return None;
        }
        task.status = next;
        let change = StatusChange {
            id: id.clone(),
            previous,
            next,
        };
        self.report_counts();
        self.notifier
            .notify(Toast::loading("Updating status…").with_key(change.toast_key()));
        tracing::debug!(task_id = %id, from = %previous, to = %next, "status change issued");
        Some(change)
    }

    /// Applies the outcome of a status change.
    ///
    /// A revert restores the captured previous status, whatever the task
    /// holds now.
    pub fn apply_status_update(&mut self, update: &StatusUpdate) {
        let key = format!("status-{}", update.id());
        match update {
            StatusUpdate::Confirmed { id, status } => {
                tracing::info!(task_id = %id, %status, "status updated");
                self.notifier
                    .notify(Toast::success("Status updated").with_key(key));
            }
            StatusUpdate::Reverted {
                id,
                previous,
                attempted,
                error,
            } => {
                if let Some(task) = self.tasks.iter_mut().find(|t| t.id == *id) {
                    task.status = *previous;
                }
                let message = Some(error.message())
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| STATUS_UPDATE_FALLBACK.to_string());
                tracing::warn!(
                    task_id = %id,
                    attempted = %attempted,
                    error = %message,
                    "status update failed, reverting"
                );
                self.notifier
                    .notify(Toast::error(message.clone()).with_key(key));
                self.error = Some(message);
                self.report_counts();
            }
        }
    }

    /// Fetches and applies the task collection in one step.
    ///
    /// Returns whether a fetch happened and was applied.
    pub async fn load<S: TaskStore>(&mut self, store: &S) -> bool {
        let Some(ticket) = self.begin_load() else {
            return false;
        };
        let result = store.list_tasks().await;
        self.finish_load(ticket, result)
    }

    /// Runs a complete status change against `store`.
    ///
    /// Returns `None` when the change was a no-op and nothing was sent.
    pub async fn change_status<S: TaskStore>(
        &mut self,
        store: &S,
        id: &TaskId,
        next: TaskStatus,
    ) -> Option<StatusUpdate> {
        let change = self.begin_status_change(id, next)?;
        let result = store.update_task_status(&change.id, change.next).await;
        let update = change.settle(result);
        self.apply_status_update(&update);
        Some(update)
    }
}
