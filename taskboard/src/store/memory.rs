//! In-process task table.
//!
//! Backs the offline demo mode and tests. Behaves like the hosted store:
//! ids and creation times are assigned on insert, empty titles are rejected
//! as a check-constraint violation, and updates to unknown ids succeed.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tokio::sync::RwLock;

use taskboard_proto::task::{
    NewTask, Task, TaskId, TaskStatus, due_date_from, next_created_at,
};

use super::{StoreError, TaskStore};

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Task>,
    last_created: Option<DateTime<Utc>>,
}

impl Table {
    /// Next creation time, strictly after the previous one so the
    /// newest-first order is total.
    fn next_created_at(&mut self) -> DateTime<Utc> {
        let ts = next_created_at(self.last_created, Utc::now());
        self.last_created = Some(ts);
        ts
    }
}

/// Task store held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    table: RwLock<Table>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `tasks`.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let last_created = tasks.iter().map(|t| t.created_at).max();
        Self {
            table: RwLock::new(Table {
                rows: tasks,
                last_created,
            }),
        }
    }

    /// Creates a store with a handful of sample tasks relative to `today`.
    #[must_use]
    pub fn demo(today: NaiveDate) -> Self {
        let now = Utc::now();
        let sample = [
            (
                "Draft quarterly report",
                Some("Numbers from finance are in the shared folder"),
                TaskStatus::InProgress,
                today.checked_add_days(chrono::Days::new(3)),
            ),
            (
                "Renew domain",
                None,
                TaskStatus::Pending,
                today.checked_sub_days(chrono::Days::new(2)),
            ),
            (
                "Call vendor",
                Some("Ask about the delayed shipment"),
                TaskStatus::Pending,
                Some(today),
            ),
            (
                "Set up CI",
                None,
                TaskStatus::Complete,
                today.checked_sub_days(chrono::Days::new(7)),
            ),
        ];
        let tasks = sample
            .into_iter()
            .enumerate()
            .map(|(i, (title, description, status, due))| Task {
                id: TaskId::new(),
                title: title.to_string(),
                description: description.map(str::to_string),
                status,
                due_date: due.map(due_date_from),
                created_at: now - Duration::minutes(i64::try_from(i).unwrap_or(0) * 5),
            })
            .collect();
        Self::with_tasks(tasks)
    }

    /// Number of stored rows.
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    /// Whether the store holds no rows.
    pub async fn is_empty(&self) -> bool {
        self.table.read().await.rows.is_empty()
    }
}

impl TaskStore for InMemoryStore {
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let mut rows = self.table.read().await.rows.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn create_task(&self, task: NewTask) -> Result<Task, StoreError> {
        if task.title.trim().is_empty() {
            return Err(StoreError::Invalid(
                "new row for relation \"tasks\" violates check constraint \"tasks_title_check\""
                    .to_string(),
            ));
        }
        let mut table = self.table.write().await;
        let row = Task {
            id: TaskId::new(),
            title: task.title,
            description: task.description,
            status: task.status,
            due_date: task.due_date,
            created_at: table.next_created_at(),
        };
        table.rows.push(row.clone());
        tracing::debug!(task_id = %row.id, "inserted task");
        Ok(row)
    }

    async fn update_task_status(&self, id: &TaskId, status: TaskStatus) -> Result<(), StoreError> {
        let mut table = self.table.write().await;
        if let Some(row) = table.rows.iter_mut().find(|t| t.id == *id) {
            row.status = status;
        }
        Ok(())
    }
}
