//! Integration tests for the store worker and the dashboard shell.
//!
//! Runs [`App`] the way the main loop does: key events produce
//! [`StoreCommand`]s, the worker executes them and the resulting
//! [`StoreEvent`]s are applied back to the app.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use taskboard::app::App;
use taskboard::net::{self, StoreCommand, StoreEvent};
use taskboard::notify::{Notifier, ToastLevel, ToastQueue};
use taskboard::store::memory::InMemoryStore;
use taskboard::store::{StoreError, TaskStore};
use taskboard::tasks::{TaskForm, TaskList};
use taskboard_proto::task::{NewTask, Task, TaskId, TaskStatus};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Store whose status updates always fail.
struct ReadOnlyStore(InMemoryStore);

impl TaskStore for ReadOnlyStore {
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        self.0.list_tasks().await
    }

    async fn create_task(&self, task: NewTask) -> Result<Task, StoreError> {
        self.0.create_task(task).await
    }

    async fn update_task_status(&self, _id: &TaskId, _status: TaskStatus) -> Result<(), StoreError> {
        Err(StoreError::Rejected {
            status: 403,
            message: "new row violates row-level security policy".to_string(),
        })
    }
}

struct Harness {
    app: App,
    toasts: Arc<ToastQueue>,
    cmd_tx: mpsc::Sender<StoreCommand>,
    evt_rx: mpsc::Receiver<StoreEvent>,
}

impl Harness {
    fn new<S: TaskStore + 'static>(store: S) -> Self {
        let toasts = Arc::new(ToastQueue::new(Duration::from_secs(60)));
        let notifier: Arc<dyn Notifier> = toasts.clone();
        let app = App::new(
            TaskList::new(Arc::clone(&notifier)),
            TaskForm::new(notifier, Duration::from_secs(3)),
            Arc::clone(&toasts),
        );
        let (cmd_tx, evt_rx) = net::spawn_store_worker(Arc::new(store), 8);
        Self {
            app,
            toasts,
            cmd_tx,
            evt_rx,
        }
    }

    /// Sends `cmd`, then applies events until no follow-up command remains.
    async fn run(&mut self, cmd: StoreCommand) {
        let mut next = Some(cmd);
        while let Some(cmd) = next.take() {
            self.cmd_tx.send(cmd).await.unwrap();
            let event = tokio::time::timeout(Duration::from_secs(5), self.evt_rx.recv())
                .await
                .expect("timed out waiting for store event")
                .expect("worker stopped");
            next = self.app.apply_store_event(event, Instant::now());
        }
    }

    async fn mount(&mut self) {
        let cmd = self.app.mount().unwrap();
        self.run(cmd).await;
    }

    async fn press(&mut self, code: KeyCode) {
        if let Some(cmd) = self.app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE)) {
            self.run(cmd).await;
        }
    }

    async fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyCode::Char(c)).await;
        }
    }
}

fn demo_store() -> InMemoryStore {
    InMemoryStore::demo(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mount_loads_and_reports_counts() {
    let mut h = Harness::new(demo_store());
    h.mount().await;

    let counts = h.app.counts();
    assert_eq!(counts.total, 4);
    assert_eq!(counts, h.app.list.counts());
    assert!(!h.app.list.is_loading());
}

#[tokio::test]
async fn adding_a_task_closes_dialog_and_reloads() {
    let mut h = Harness::new(InMemoryStore::new());
    h.mount().await;
    assert_eq!(h.app.counts().total, 0);

    h.press(KeyCode::Char('a')).await;
    assert!(h.app.add_open);
    h.type_text("Water plants").await;
    h.press(KeyCode::Enter).await;

    assert!(!h.app.add_open);
    assert_eq!(h.app.refresh_key, 1);
    assert_eq!(h.app.counts().total, 1);
    assert_eq!(h.app.list.tasks()[0].title, "Water plants");
    assert!(h.app.form.fields().title.is_empty());
    assert_eq!(h.app.form.success_message(), Some("Task added successfully"));
}

#[tokio::test]
async fn blank_title_keeps_dialog_open() {
    let mut h = Harness::new(InMemoryStore::new());
    h.mount().await;

    h.press(KeyCode::Char('a')).await;
    h.type_text("   ").await;
    h.press(KeyCode::Enter).await;

    assert!(h.app.add_open);
    assert_eq!(h.app.form.error(), Some("Title is required"));
    assert_eq!(h.app.counts().total, 0);
}

#[tokio::test]
async fn status_key_updates_selected_task() {
    let mut h = Harness::new(demo_store());
    h.mount().await;
    let id = h.app.selected_task_id().unwrap();
    let before = h.app.list.status_of(&id).unwrap();
    let target = if before == TaskStatus::Complete {
        TaskStatus::Pending
    } else {
        TaskStatus::Complete
    };
    let key = if target == TaskStatus::Complete { 'c' } else { 'p' };

    h.press(KeyCode::Char(key)).await;
    assert_eq!(h.app.list.status_of(&id), Some(target));

    h.press(KeyCode::Char('r')).await;
    assert_eq!(h.app.list.status_of(&id), Some(target));
}

#[tokio::test]
async fn rejected_status_change_reverts() {
    let mut h = Harness::new(ReadOnlyStore(demo_store()));
    h.mount().await;
    let id = h.app.selected_task_id().unwrap();
    let before = h.app.list.status_of(&id).unwrap();
    let counts_before = h.app.counts();

    h.press(KeyCode::Right).await;

    assert_eq!(h.app.list.status_of(&id), Some(before));
    assert_eq!(h.app.counts(), counts_before);
    assert_eq!(
        h.app.list.error(),
        Some("new row violates row-level security policy")
    );
    let latest = h.toasts.latest(Instant::now()).unwrap();
    assert_eq!(latest.level, ToastLevel::Error);
}

#[tokio::test]
async fn search_narrows_visible_tasks() {
    let mut h = Harness::new(demo_store());
    h.mount().await;

    h.press(KeyCode::Char('/')).await;
    h.type_text("VENDOR").await;

    let titles: Vec<_> = h.app.visible_tasks().iter().map(|t| t.title.clone()).collect();
    assert_eq!(titles, ["Call vendor"]);
    assert_eq!(h.app.list.tasks().len(), 4);
}
