//! Store worker wiring the TUI loop to the async [`TaskStore`].
//!
//! The TUI thread owns all dashboard state and never awaits. It sends
//! [`StoreCommand`]s and drains [`StoreEvent`]s on each tick:
//!
//! ```text
//! TUI (main thread)  ←── StoreEvent ───  store worker (tokio tasks)
//!                     ─── StoreCommand →
//! ```
//!
//! Every command runs as its own tokio task, so a slow insert never holds
//! up a status change and several status changes can be in flight at once.
//! Requests are never cancelled; results arrive in completion order.

use std::sync::Arc;

use tokio::sync::mpsc;

use taskboard_proto::task::{NewTask, Task};

use crate::store::{StoreError, TaskStore};
use crate::tasks::{LoadTicket, StatusChange, StatusUpdate};

/// Default channel capacity for commands and events.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Requests from the TUI loop to the store worker.
#[derive(Debug)]
pub enum StoreCommand {
    /// Fetch all tasks for the given load.
    LoadTasks {
        /// Ticket issued by the task list.
        ticket: LoadTicket,
    },
    /// Insert a task.
    CreateTask {
        /// Normalized payload from the form.
        payload: NewTask,
    },
    /// Persist an optimistic status change.
    UpdateStatus {
        /// The change already applied locally.
        change: StatusChange,
    },
    /// Stop accepting commands. In-flight requests still report back.
    Shutdown,
}

impl StoreCommand {
    /// The event this command would produce had the store failed with
    /// `error`. `None` for [`StoreCommand::Shutdown`].
    #[must_use]
    pub fn into_failure(self, error: StoreError) -> Option<StoreEvent> {
        match self {
            Self::LoadTasks { ticket } => Some(StoreEvent::TasksLoaded {
                ticket,
                result: Err(error),
            }),
            Self::CreateTask { .. } => Some(StoreEvent::TaskCreated { result: Err(error) }),
            Self::UpdateStatus { change } => Some(StoreEvent::StatusSettled {
                update: change.settle(Err(error)),
            }),
            Self::Shutdown => None,
        }
    }
}

/// Results from the store worker back to the TUI loop.
#[derive(Debug)]
pub enum StoreEvent {
    /// A load finished.
    TasksLoaded {
        /// Ticket the load was issued with.
        ticket: LoadTicket,
        /// Fetched rows or the failure.
        result: Result<Vec<Task>, StoreError>,
    },
    /// An insert finished.
    TaskCreated {
        /// Stored row or the failure.
        result: Result<Task, StoreError>,
    },
    /// A status change settled.
    StatusSettled {
        /// Confirmed or reverted outcome.
        update: StatusUpdate,
    },
}

/// Spawn the store worker and return its channel handles.
///
/// Must be called from within a tokio runtime.
pub fn spawn_store_worker<S: TaskStore + 'static>(
    store: Arc<S>,
    capacity: usize,
) -> (mpsc::Sender<StoreCommand>, mpsc::Receiver<StoreEvent>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<StoreCommand>(capacity);
    let (evt_tx, evt_rx) = mpsc::channel::<StoreEvent>(capacity);
    tokio::spawn(async move {
        command_handler(store, cmd_rx, evt_tx).await;
    });
    (cmd_tx, evt_rx)
}

/// Background task: dispatch each command onto its own task.
async fn command_handler<S: TaskStore + 'static>(
    store: Arc<S>,
    mut cmd_rx: mpsc::Receiver<StoreCommand>,
    evt_tx: mpsc::Sender<StoreEvent>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        let store = Arc::clone(&store);
        let evt_tx = evt_tx.clone();
        match cmd {
            StoreCommand::LoadTasks { ticket } => {
                tokio::spawn(async move {
                    let result = store.list_tasks().await;
                    forward(&evt_tx, StoreEvent::TasksLoaded { ticket, result }).await;
                });
            }
            StoreCommand::CreateTask { payload } => {
                tokio::spawn(async move {
                    let result = store.create_task(payload).await;
                    forward(&evt_tx, StoreEvent::TaskCreated { result }).await;
                });
            }
            StoreCommand::UpdateStatus { change } => {
                tokio::spawn(async move {
                    let result = store.update_task_status(&change.id, change.next).await;
                    let update = change.settle(result);
                    forward(&evt_tx, StoreEvent::StatusSettled { update }).await;
                });
            }
            StoreCommand::Shutdown => {
                tracing::info!("store worker shutting down");
                break;
            }
        }
    }
}

async fn forward(evt_tx: &mpsc::Sender<StoreEvent>, event: StoreEvent) {
    if evt_tx.send(event).await.is_err() {
        // TUI dropped.
        tracing::debug!("store event receiver closed");
    }
}
