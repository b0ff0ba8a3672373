//! Integration tests for the add-task form.
//!
//! Checks validation, payload normalization, reset-on-success and
//! keep-on-failure against a store that records every insert.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use taskboard::notify::{ToastLevel, ToastQueue};
use taskboard::store::memory::InMemoryStore;
use taskboard::store::{StoreError, TaskStore};
use taskboard::tasks::form::SUCCESS_MESSAGE;
use taskboard::tasks::{FormFields, TaskError, TaskForm, ValidationError};
use taskboard_proto::task::{NewTask, Task, TaskId, TaskStatus};

/// Store recording insert payloads, optionally failing them.
#[derive(Default)]
struct InsertRecorder {
    inner: InMemoryStore,
    payloads: Mutex<Vec<NewTask>>,
    insert_error: Mutex<Option<StoreError>>,
}

impl TaskStore for InsertRecorder {
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        self.inner.list_tasks().await
    }

    async fn create_task(&self, task: NewTask) -> Result<Task, StoreError> {
        self.payloads.lock().push(task.clone());
        let failure = self.insert_error.lock().clone();
        if let Some(error) = failure {
            return Err(error);
        }
        self.inner.create_task(task).await
    }

    async fn update_task_status(&self, id: &TaskId, status: TaskStatus) -> Result<(), StoreError> {
        self.inner.update_task_status(id, status).await
    }
}

fn form_with_toasts() -> (TaskForm, Arc<ToastQueue>) {
    let toasts = Arc::new(ToastQueue::new(Duration::from_secs(60)));
    (TaskForm::new(toasts.clone(), Duration::from_secs(3)), toasts)
}

#[tokio::test]
async fn whitespace_title_never_reaches_store() {
    let store = InsertRecorder::default();
    let (mut form, toasts) = form_with_toasts();
    form.fields_mut().title = "   ".to_string();

    let err = form.submit(&store).await.unwrap_err();

    assert_eq!(err, TaskError::Validation(ValidationError::TitleRequired));
    assert!(store.payloads.lock().is_empty());
    assert_eq!(form.error(), Some("Title is required"));
    assert!(!form.is_loading());
    let shown = toasts.snapshot();
    assert_eq!(shown[0].level, ToastLevel::Error);
}

#[tokio::test]
async fn malformed_due_date_never_reaches_store() {
    let store = InsertRecorder::default();
    let (mut form, _) = form_with_toasts();
    form.fields_mut().title = "Pay rent".to_string();
    form.fields_mut().due_date = "2025-02-30".to_string();

    let err = form.submit(&store).await.unwrap_err();

    assert!(matches!(
        err,
        TaskError::Validation(ValidationError::InvalidDueDate(_))
    ));
    assert!(store.payloads.lock().is_empty());
    assert_eq!(form.fields().due_date, "2025-02-30");
}

#[tokio::test]
async fn submit_sends_normalized_payload_and_resets() {
    let store = InsertRecorder::default();
    let (mut form, toasts) = form_with_toasts();
    *form.fields_mut() = FormFields {
        title: "  Call vendor ".to_string(),
        description: "   ".to_string(),
        due_date: "2025-01-01".to_string(),
        status: TaskStatus::InProgress,
    };

    let created = form.submit(&store).await.unwrap().unwrap();

    let payloads = store.payloads.lock().clone();
    assert_eq!(payloads.len(), 1);
    assert_eq!(
        serde_json::to_value(&payloads[0]).unwrap(),
        serde_json::json!({
            "title": "Call vendor",
            "description": null,
            "due_date": "2025-01-01T00:00:00.000Z",
            "status": "in_progress",
        })
    );
    assert_eq!(created.title, "Call vendor");
    assert_eq!(created.status, TaskStatus::InProgress);

    assert_eq!(form.fields(), &FormFields::default());
    assert_eq!(form.success_message(), Some(SUCCESS_MESSAGE));
    assert!(form.error().is_none());

    let shown = toasts.snapshot();
    let last = shown.last().unwrap();
    assert_eq!(last.level, ToastLevel::Success);
    assert_eq!(last.title, "Task added");
    assert_eq!(last.description.as_deref(), Some("Call vendor"));
}

#[tokio::test]
async fn store_failure_keeps_input() {
    let store = InsertRecorder::default();
    *store.insert_error.lock() = Some(StoreError::Rejected {
        status: 409,
        message: "duplicate key value violates unique constraint".to_string(),
    });
    let (mut form, toasts) = form_with_toasts();
    let typed = FormFields {
        title: "Call vendor".to_string(),
        description: "about the invoice".to_string(),
        due_date: "2025-03-01".to_string(),
        status: TaskStatus::Complete,
    };
    *form.fields_mut() = typed.clone();

    let err = form.submit(&store).await.unwrap_err();

    assert!(matches!(err, TaskError::Store(StoreError::Rejected { status: 409, .. })));
    assert_eq!(form.fields(), &typed);
    assert_eq!(
        form.error(),
        Some("duplicate key value violates unique constraint")
    );
    assert!(form.success_message().is_none());
    assert!(!form.is_loading());

    let shown = toasts.snapshot();
    let last = shown.last().unwrap();
    assert_eq!(last.title, "Failed to add task");
    assert_eq!(
        last.description.as_deref(),
        Some("duplicate key value violates unique constraint")
    );
}

#[test]
fn second_submit_while_in_flight_is_ignored() {
    let (mut form, _) = form_with_toasts();
    form.fields_mut().title = "once".to_string();

    assert!(form.begin_submit().unwrap().is_some());
    assert!(form.is_loading());
    assert!(form.begin_submit().unwrap().is_none());
}

#[test]
fn success_message_clears_after_delay() {
    let (mut form, _) = form_with_toasts();
    form.fields_mut().title = "t".to_string();
    let payload = form.begin_submit().unwrap().unwrap();
    let row = Task {
        id: TaskId::new(),
        title: payload.title,
        description: payload.description,
        status: payload.status,
        due_date: payload.due_date,
        created_at: chrono::Utc::now(),
    };

    let shown_at = Instant::now();
    form.finish_submit(Ok(row), shown_at);
    form.tick(shown_at + Duration::from_millis(2_900));
    assert_eq!(form.success_message(), Some(SUCCESS_MESSAGE));
    form.tick(shown_at + Duration::from_secs(3));
    assert!(form.success_message().is_none());
}
