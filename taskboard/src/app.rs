//! Dashboard shell: application state and key handling.
//!
//! Owns the search query and refresh key, hosts the add-task dialog and
//! receives counts from the task list observer. Key handlers never touch the
//! network; they return the [`StoreCommand`] the main loop should dispatch.

use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use parking_lot::Mutex;

use taskboard_proto::task::{Task, TaskId, TaskStatus};

use crate::net::{StoreCommand, StoreEvent};
use crate::notify::ToastQueue;
use crate::tasks::{FormField, TaskCounts, TaskForm, TaskList};

/// Which panel is currently focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Search box.
    Search,
    /// Task table (default).
    Tasks,
}

/// Main application state.
pub struct App {
    /// Task list component.
    pub list: TaskList,
    /// Add-task form component.
    pub form: TaskForm,
    /// Search query, owned here and passed to the list.
    pub query: String,
    /// Bumped to request a reload.
    pub refresh_key: u64,
    /// Counts last reported by the list.
    pub counts: Arc<Mutex<TaskCounts>>,
    /// Which panel is focused.
    pub focus: PanelFocus,
    /// Whether the add-task dialog is open.
    pub add_open: bool,
    /// Focused field in the add-task dialog.
    pub form_field: FormField,
    /// Selected row in the visible task table.
    pub selected: usize,
    /// Toasts shown in the status bar.
    pub toasts: Arc<ToastQueue>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Builds the shell around the two components and wires the counts
    /// observer.
    #[must_use]
    pub fn new(mut list: TaskList, form: TaskForm, toasts: Arc<ToastQueue>) -> Self {
        let counts = Arc::new(Mutex::new(TaskCounts::default()));
        let sink = Arc::clone(&counts);
        list.set_counts_observer(move |c| *sink.lock() = c);
        Self {
            list,
            form,
            query: String::new(),
            refresh_key: 0,
            counts,
            focus: PanelFocus::Tasks,
            add_open: false,
            form_field: FormField::Title,
            selected: 0,
            toasts,
            should_quit: false,
        }
    }

    /// Counts as last reported by the list.
    #[must_use]
    pub fn counts(&self) -> TaskCounts {
        *self.counts.lock()
    }

    /// Tasks currently visible under the search query.
    #[must_use]
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.list.visible(Some(&self.query))
    }

    /// Id of the selected visible task.
    #[must_use]
    pub fn selected_task_id(&self) -> Option<TaskId> {
        self.visible_tasks()
            .get(self.selected)
            .map(|t| t.id.clone())
    }

    /// Initial load.
    pub fn mount(&mut self) -> Option<StoreCommand> {
        self.list
            .begin_load()
            .map(|ticket| StoreCommand::LoadTasks { ticket })
    }

    /// Bumps the refresh key and reloads.
    pub fn refresh(&mut self) -> Option<StoreCommand> {
        self.refresh_key += 1;
        tracing::debug!(refresh_key = self.refresh_key, "refresh requested");
        self.mount()
    }

    /// A task was created: close the dialog and reload.
    pub fn handle_created(&mut self, task: &Task) -> Option<StoreCommand> {
        tracing::debug!(task_id = %task.id, "closing add dialog after create");
        self.add_open = false;
        self.refresh()
    }

    /// Applies a store result, returning any follow-up command.
    pub fn apply_store_event(&mut self, event: StoreEvent, now: Instant) -> Option<StoreCommand> {
        match event {
            StoreEvent::TasksLoaded { ticket, result } => {
                self.list.finish_load(ticket, result);
                self.clamp_selection();
                None
            }
            StoreEvent::TaskCreated { result } => {
                let created = self.form.finish_submit(result, now)?;
                self.handle_created(&created)
            }
            StoreEvent::StatusSettled { update } => {
                self.list.apply_status_update(&update);
                None
            }
        }
    }

    /// Expires timed messages.
    pub fn tick(&mut self, now: Instant) {
        self.form.tick(now);
        self.toasts.prune(now);
    }

    /// Handle a key event, returning a store command to dispatch.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<StoreCommand> {
        if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
            self.should_quit = true;
            return None;
        }
        if self.add_open {
            return self.handle_form_key(key);
        }
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => {
                self.should_quit = true;
                None
            }
            (KeyCode::Tab | KeyCode::BackTab, _) => {
                self.toggle_focus();
                None
            }
            (KeyCode::F(5), _) => self.refresh(),
            _ => match self.focus {
                PanelFocus::Search => {
                    self.handle_search_key(key);
                    None
                }
                PanelFocus::Tasks => self.handle_tasks_key(key),
            },
        }
    }

    /// Key handling while the search box is focused.
    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Down => self.focus = PanelFocus::Tasks,
            KeyCode::Char(c) => {
                self.query.push(c);
                self.selected = 0;
            }
            KeyCode::Backspace => {
                self.query.pop();
                self.selected = 0;
            }
            _ => {}
        }
    }

    /// Key handling while the task table is focused.
    fn handle_tasks_key(&mut self, key: KeyEvent) -> Option<StoreCommand> {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('/') => {
                self.focus = PanelFocus::Search;
                None
            }
            KeyCode::Char('a') => {
                self.open_add_dialog();
                None
            }
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.visible_tasks().len() {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Char('p') => self.set_selected_status(TaskStatus::Pending),
            KeyCode::Char('i') => self.set_selected_status(TaskStatus::InProgress),
            KeyCode::Char('c') => self.set_selected_status(TaskStatus::Complete),
            KeyCode::Right | KeyCode::Char('l') => self.cycle_selected_status(TaskStatus::next),
            KeyCode::Left | KeyCode::Char('h') => self.cycle_selected_status(TaskStatus::prev),
            _ => None,
        }
    }

    /// Key handling inside the add-task dialog.
    fn handle_form_key(&mut self, key: KeyEvent) -> Option<StoreCommand> {
        match key.code {
            KeyCode::Esc => {
                self.add_open = false;
                None
            }
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab | KeyCode::Down => {
                self.form_field = self.form_field.next();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.form_field = self.form_field.prev();
                None
            }
            KeyCode::Left if self.form_field == FormField::Status => {
                let fields = self.form.fields_mut();
                fields.status = fields.status.prev();
                None
            }
            KeyCode::Right | KeyCode::Char(' ') if self.form_field == FormField::Status => {
                let fields = self.form.fields_mut();
                fields.status = fields.status.next();
                None
            }
            KeyCode::Char(c) => {
                if let Some(text) = self.form.fields_mut().text_mut(self.form_field) {
                    text.push(c);
                }
                None
            }
            KeyCode::Backspace => {
                if let Some(text) = self.form.fields_mut().text_mut(self.form_field) {
                    text.pop();
                }
                None
            }
            _ => None,
        }
    }

    fn open_add_dialog(&mut self) {
        self.add_open = true;
        self.form_field = FormField::Title;
    }

    /// Submits the form unless it is invalid or already submitting.
    fn submit_form(&mut self) -> Option<StoreCommand> {
        match self.form.begin_submit() {
            Ok(Some(payload)) => Some(StoreCommand::CreateTask { payload }),
            Ok(None) | Err(_) => None,
        }
    }

    fn set_selected_status(&mut self, next: TaskStatus) -> Option<StoreCommand> {
        let id = self.selected_task_id()?;
        self.list
            .begin_status_change(&id, next)
            .map(|change| StoreCommand::UpdateStatus { change })
    }

    fn cycle_selected_status(&mut self, step: fn(TaskStatus) -> TaskStatus) -> Option<StoreCommand> {
        let id = self.selected_task_id()?;
        let current = self.list.status_of(&id)?;
        self.set_selected_status(step(current))
    }

    const fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            PanelFocus::Search => PanelFocus::Tasks,
            PanelFocus::Tasks => PanelFocus::Search,
        };
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_tasks().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}
