//! Integration tests for the REST store against the development server.
//!
//! Each test starts an in-process `taskboard-server` on an OS-assigned port
//! and talks to it through [`RestStore`] exactly as the dashboard does.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::task::JoinHandle;

use taskboard::notify::NullNotifier;
use taskboard::store::rest::{RestConfig, RestStore};
use taskboard::store::{StoreError, TaskStore};
use taskboard::tasks::{FormFields, StatusUpdate, TaskForm, TaskList};
use taskboard_proto::task::{NewTask, TaskId, TaskStatus, due_date_from};
use taskboard_server::api::ServerState;
use taskboard_server::store::TaskTable;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn start_server(api_key: Option<&str>) -> (String, JoinHandle<()>) {
    let state = Arc::new(ServerState::new(
        TaskTable::new(),
        api_key.map(str::to_string),
    ));
    let (addr, handle) =
        taskboard_server::start_server_with_state("127.0.0.1:0", state, 64 * 1024)
            .await
            .expect("failed to start test server");
    (format!("http://{addr}"), handle)
}

fn client(base_url: &str, api_key: Option<&str>) -> RestStore {
    RestStore::new(&RestConfig {
        base_url: base_url.to_string(),
        api_key: api_key.map(str::to_string),
        request_timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn new_task(title: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: None,
        status: TaskStatus::Pending,
        due_date: None,
    }
}

// ---------------------------------------------------------------------------
// Store operations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_is_newest_first() {
    let (base, handle) = start_server(None).await;
    let store = client(&base, None);

    for title in ["first", "second", "third"] {
        store.create_task(new_task(title)).await.unwrap();
    }
    let titles: Vec<_> = store
        .list_tasks()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, ["third", "second", "first"]);

    handle.abort();
}

#[tokio::test]
async fn create_returns_stored_row() {
    let (base, handle) = start_server(None).await;
    let store = client(&base, None);
    let due = due_date_from(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());

    let created = store
        .create_task(NewTask {
            title: "Call vendor".to_string(),
            description: Some("about the invoice".to_string()),
            status: TaskStatus::InProgress,
            due_date: Some(due),
        })
        .await
        .unwrap();

    assert_eq!(created.title, "Call vendor");
    assert_eq!(created.description.as_deref(), Some("about the invoice"));
    assert_eq!(created.status, TaskStatus::InProgress);
    assert_eq!(created.due_date, Some(due));

    let listed = store.list_tasks().await.unwrap();
    assert_eq!(listed, vec![created]);

    handle.abort();
}

#[tokio::test]
async fn status_patch_is_persisted() {
    let (base, handle) = start_server(None).await;
    let store = client(&base, None);
    let created = store.create_task(new_task("patch me")).await.unwrap();

    store
        .update_task_status(&created.id, TaskStatus::Complete)
        .await
        .unwrap();
    let listed = store.list_tasks().await.unwrap();
    assert_eq!(listed[0].status, TaskStatus::Complete);

    // Zero matching rows is not an error.
    store
        .update_task_status(&TaskId::new(), TaskStatus::Pending)
        .await
        .unwrap();

    handle.abort();
}

#[tokio::test]
async fn constraint_message_passes_through() {
    let (base, handle) = start_server(None).await;
    let store = client(&base, None);

    let err = store.create_task(new_task("  ")).await.unwrap_err();

    let StoreError::Rejected { status, message } = &err else {
        panic!("expected Rejected, got {err:?}");
    };
    assert_eq!(*status, 400);
    assert!(message.contains("tasks_title_check"), "message: {message}");
    assert_eq!(err.message(), *message);

    handle.abort();
}

#[tokio::test]
async fn wrong_api_key_is_rejected() {
    let (base, handle) = start_server(Some("anon-key")).await;

    let err = client(&base, Some("stolen")).list_tasks().await.unwrap_err();
    assert_eq!(
        err,
        StoreError::Rejected {
            status: 401,
            message: "Invalid API key".to_string(),
        }
    );

    let err = client(&base, None).list_tasks().await.unwrap_err();
    assert!(matches!(err, StoreError::Rejected { status: 401, .. }));

    assert!(client(&base, Some("anon-key")).list_tasks().await.is_ok());

    handle.abort();
}

#[tokio::test]
async fn unreachable_store_is_unavailable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}"), None)
        .list_tasks()
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
}

// ---------------------------------------------------------------------------
// Components over REST
// ---------------------------------------------------------------------------

#[tokio::test]
async fn form_and_list_round_trip_over_rest() {
    let (base, handle) = start_server(None).await;
    let store = client(&base, None);
    let notifier = Arc::new(NullNotifier);

    let mut form = TaskForm::new(notifier.clone(), Duration::from_secs(3));
    *form.fields_mut() = FormFields {
        title: "Renew domain".to_string(),
        description: String::new(),
        due_date: "2025-06-01".to_string(),
        status: TaskStatus::Pending,
    };
    let created = form.submit(&store).await.unwrap().unwrap();

    let mut list = TaskList::new(notifier);
    assert!(list.load(&store).await);
    assert_eq!(list.tasks().len(), 1);
    assert_eq!(list.tasks()[0].id, created.id);
    assert!(list.tasks()[0].description.is_none());

    let update = list
        .change_status(&store, &created.id, TaskStatus::InProgress)
        .await
        .unwrap();
    assert!(matches!(update, StatusUpdate::Confirmed { .. }));

    list.load(&store).await;
    assert_eq!(list.status_of(&created.id), Some(TaskStatus::InProgress));
    assert_eq!(list.counts().in_progress, 1);

    handle.abort();
}
