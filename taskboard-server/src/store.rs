//! In-memory `tasks` table behind the development server.
//!
//! Mirrors the constraints of the hosted table: the server assigns `id` and
//! `created_at`, titles must be non-empty, and an update that matches no row
//! affects zero rows without failing.

use chrono::{DateTime, Days, Duration, NaiveDate, Utc};
use tokio::sync::RwLock;

use taskboard_proto::task::{
    NewTask, Task, TaskId, TaskStatus, due_date_from, next_created_at,
};

/// Sort direction on `created_at`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    /// Oldest first.
    Ascending,
    /// Newest first.
    #[default]
    Descending,
}

impl Order {
    /// Parses a PostgREST `order` value. Only `created_at` is sortable.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "created_at" | "created_at.asc" => Some(Self::Ascending),
            "created_at.desc" => Some(Self::Descending),
            _ => None,
        }
    }
}

/// A row rejected by the table's check constraint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("new row for relation \"tasks\" violates check constraint \"{constraint}\"")]
pub struct CheckViolation {
    /// Name of the violated constraint.
    pub constraint: &'static str,
}

#[derive(Debug, Default)]
struct Rows {
    tasks: Vec<Task>,
    last_created: Option<DateTime<Utc>>,
}

impl Rows {
    fn next_created_at(&mut self) -> DateTime<Utc> {
        let ts = next_created_at(self.last_created, Utc::now());
        self.last_created = Some(ts);
        ts
    }
}

/// The `tasks` table, shared by all request handlers.
#[derive(Debug, Default)]
pub struct TaskTable {
    rows: RwLock<Rows>,
}

impl TaskTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table with a few sample rows due around `today`.
    #[must_use]
    pub fn with_demo_rows(today: NaiveDate) -> Self {
        let samples = [
            ("Write release notes", TaskStatus::InProgress, today.checked_add_days(Days::new(1))),
            ("Review open pull requests", TaskStatus::Pending, Some(today)),
            ("Rotate staging credentials", TaskStatus::Pending, today.checked_sub_days(Days::new(3))),
            ("Book team offsite", TaskStatus::Complete, None),
        ];
        let base = Utc::now();
        let tasks = (0i64..)
            .zip(samples)
            .map(|(offset, (title, status, due))| Task {
                id: TaskId::new(),
                title: title.to_string(),
                description: None,
                status,
                due_date: due.map(due_date_from),
                created_at: base - Duration::minutes(offset * 10),
            })
            .collect();
        Self {
            rows: RwLock::new(Rows {
                tasks,
                last_created: Some(base),
            }),
        }
    }

    /// All rows sorted by `created_at`.
    pub async fn list(&self, order: Order) -> Vec<Task> {
        let mut tasks = self.rows.read().await.tasks.clone();
        match order {
            Order::Ascending => tasks.sort_by_key(|t| t.created_at),
            Order::Descending => tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
        tasks
    }

    /// Inserts a row, assigning its id and creation time.
    ///
    /// # Errors
    ///
    /// Returns [`CheckViolation`] if the title is blank.
    pub async fn insert(&self, new: NewTask) -> Result<Task, CheckViolation> {
        if new.title.trim().is_empty() {
            return Err(CheckViolation {
                constraint: "tasks_title_check",
            });
        }
        let mut rows = self.rows.write().await;
        let created_at = rows.next_created_at();
        let task = Task {
            id: TaskId::new(),
            title: new.title,
            description: new.description,
            status: new.status,
            due_date: new.due_date,
            created_at,
        };
        rows.tasks.push(task.clone());
        drop(rows);
        Ok(task)
    }

    /// Sets the status of the row with `id`, returning the number of rows
    /// affected (0 or 1).
    pub async fn update_status(&self, id: &TaskId, status: TaskStatus) -> usize {
        let mut rows = self.rows.write().await;
        rows.tasks
            .iter_mut()
            .find(|t| t.id == *id)
            .map_or(0, |task| {
                task.status = status;
                1
            })
    }

    /// Number of rows.
    pub async fn len(&self) -> usize {
        self.rows.read().await.tasks.len()
    }

    /// Whether the table has no rows.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.tasks.is_empty()
    }
}
