//! Task creation form: validation, normalization, submit lifecycle.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;

use taskboard_proto::task::{NewTask, Task, TaskStatus, due_date_from};

use super::{TaskError, ValidationError};
use crate::notify::{Notifier, Toast};
use crate::store::{StoreError, TaskStore};

/// Message shown after a successful insert.
pub const SUCCESS_MESSAGE: &str = "Task added successfully";

/// Default time the success message stays visible.
pub const DEFAULT_SUCCESS_TTL: Duration = Duration::from_secs(3);

/// Raw form input. `Default` is the cleared form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    /// Title as typed.
    pub title: String,
    /// Description as typed.
    pub description: String,
    /// Due date as typed, `YYYY-MM-DD` or empty.
    pub due_date: String,
    /// Selected status.
    pub status: TaskStatus,
}

/// Input field of the form, in tab order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
    /// Title input.
    #[default]
    Title,
    /// Description input.
    Description,
    /// Due date input.
    DueDate,
    /// Status selector.
    Status,
}

impl FormField {
    /// Next field in tab order, wrapping.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Description => Self::DueDate,
            Self::DueDate => Self::Status,
            Self::Status => Self::Title,
        }
    }

    /// Previous field in tab order, wrapping.
    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::Title => Self::Status,
            Self::Description => Self::Title,
            Self::DueDate => Self::Description,
            Self::Status => Self::DueDate,
        }
    }

    /// Field label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::DueDate => "Due date",
            Self::Status => "Status",
        }
    }
}

impl FormFields {
    /// Text buffer behind `field`; `None` for the status selector.
    pub const fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::DueDate => Some(&mut self.due_date),
            FormField::Status => None,
        }
    }

    /// Validates and normalizes the input into an insert payload.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TitleRequired`] if the title is blank, or
    /// [`ValidationError::InvalidDueDate`] if the due date is neither empty
    /// nor a `YYYY-MM-DD` date.
    pub fn to_new_task(&self) -> Result<NewTask, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::TitleRequired);
        }
        let description = Some(self.description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        let due = self.due_date.trim();
        let due_date = if due.is_empty() {
            None
        } else {
            let date = NaiveDate::parse_from_str(due, "%Y-%m-%d")
                .map_err(|_| ValidationError::InvalidDueDate(due.to_string()))?;
            Some(due_date_from(date))
        };
        Ok(NewTask {
            title: title.to_string(),
            description,
            status: self.status,
            due_date,
        })
    }
}

/// Form state around one insert at a time.
pub struct TaskForm {
    fields: FormFields,
    loading: bool,
    error: Option<String>,
    success: Option<Instant>,
    success_ttl: Duration,
    submitted_title: String,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for TaskForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskForm")
            .field("fields", &self.fields)
            .field("loading", &self.loading)
            .field("error", &self.error)
            .field("success", &self.success)
            .finish_non_exhaustive()
    }
}

impl TaskForm {
    /// Creates an empty form whose success message lasts `success_ttl`.
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>, success_ttl: Duration) -> Self {
        Self {
            fields: FormFields::default(),
            loading: false,
            error: None,
            success: None,
            success_ttl,
            submitted_title: String::new(),
            notifier,
        }
    }

    /// Current input.
    #[must_use]
    pub const fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Mutable input, for key handling.
    pub const fn fields_mut(&mut self) -> &mut FormFields {
        &mut self.fields
    }

    /// Whether an insert is in flight (submission disabled).
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Inline error message.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Inline success message, until it expires.
    #[must_use]
    pub const fn success_message(&self) -> Option<&'static str> {
        match self.success {
            Some(_) => Some(SUCCESS_MESSAGE),
            None => None,
        }
    }

    /// Clears the success message once its delay has passed.
    pub fn tick(&mut self, now: Instant) {
        let expired = self
            .success
            .is_some_and(|shown| now.saturating_duration_since(shown) >= self.success_ttl);
        if expired {
            self.success = None;
        }
    }

    /// Validates the input and marks the form as submitting.
    ///
    /// Returns `Ok(None)` while a previous insert is still in flight.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] when the input is rejected; the
    /// message is shown inline and posted as an error toast.
    pub fn begin_submit(&mut self) -> Result<Option<NewTask>, ValidationError> {
        if self.loading {
            return Ok(None);
        }
        self.error = None;
        self.success = None;
        match self.fields.to_new_task() {
            Ok(payload) => {
                self.loading = true;
                self.submitted_title.clone_from(&payload.title);
                tracing::debug!(title = %payload.title, "submitting task");
                Ok(Some(payload))
            }
            Err(e) => {
                let message = e.to_string();
                tracing::debug!(error = %message, "task form rejected input");
                self.notifier.notify(Toast::error(message.clone()));
                self.error = Some(message);
                Err(e)
            }
        }
    }

    /// Applies the insert result.
    ///
    /// On success the fields reset and the created row is returned for the
    /// caller. On failure all input is kept.
    pub fn finish_submit(&mut self, result: Result<Task, StoreError>, now: Instant) -> Option<Task> {
        self.loading = false;
        match result {
            Ok(task) => {
                tracing::info!(task_id = %task.id, "task added");
                self.fields = FormFields::default();
                self.success = Some(now);
                let toast = Toast::success("Task added");
                let toast = if self.submitted_title.is_empty() {
                    toast
                } else {
                    toast.with_description(self.submitted_title.clone())
                };
                self.notifier.notify(toast);
                Some(task)
            }
            Err(e) => {
                let message = e.message();
                tracing::warn!(error = %message, "failed to add task");
                self.notifier
                    .notify(Toast::error("Failed to add task").with_description(message.clone()));
                self.error = Some(message);
                None
            }
        }
    }

    /// Validates, inserts and applies the result in one step.
    ///
    /// Returns `Ok(None)` if an insert was already in flight.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Validation`] for rejected input (no insert is
    /// issued) and [`TaskError::Store`] when the insert fails.
    pub async fn submit<S: TaskStore>(&mut self, store: &S) -> Result<Option<Task>, TaskError> {
        let Some(payload) = self.begin_submit()? else {
            return Ok(None);
        };
        match store.create_task(payload).await {
            Ok(task) => Ok(self.finish_submit(Ok(task), Instant::now())),
            Err(e) => {
                self.finish_submit(Err(e.clone()), Instant::now());
                Err(e.into())
            }
        }
    }
}
