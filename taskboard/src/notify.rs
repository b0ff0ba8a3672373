//! Transient notifications ("toasts").
//!
//! Components report outcomes through the fire-and-forget [`Notifier`]
//! trait and never look at what happens to a toast afterwards. The TUI
//! plugs in a [`ToastQueue`] and renders its newest entry in the status bar.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    /// An operation is in flight. Does not expire on its own.
    Loading,
    /// An operation finished successfully.
    Success,
    /// An operation failed.
    Error,
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Severity.
    pub level: ToastLevel,
    /// Headline text.
    pub title: String,
    /// Optional second line.
    pub description: Option<String>,
    /// Toasts sharing a key replace each other.
    pub key: Option<String>,
}

impl Toast {
    fn with_level(level: ToastLevel, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: None,
            key: None,
        }
    }

    /// A loading toast.
    #[must_use]
    pub fn loading(title: impl Into<String>) -> Self {
        Self::with_level(ToastLevel::Loading, title)
    }

    /// A success toast.
    #[must_use]
    pub fn success(title: impl Into<String>) -> Self {
        Self::with_level(ToastLevel::Success, title)
    }

    /// An error toast.
    #[must_use]
    pub fn error(title: impl Into<String>) -> Self {
        Self::with_level(ToastLevel::Error, title)
    }

    /// Sets the second line.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the replacement key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// Fire-and-forget sink for toasts.
pub trait Notifier: Send + Sync {
    /// Posts a toast. Must not block.
    fn notify(&self, toast: Toast);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, toast: Toast) {
        (**self).notify(toast);
    }
}

/// Notifier that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _toast: Toast) {}
}

#[derive(Debug)]
struct Posted {
    toast: Toast,
    at: Instant,
}

/// Toast store with expiry and same-key replacement.
#[derive(Debug)]
pub struct ToastQueue {
    entries: Mutex<Vec<Posted>>,
    ttl: Duration,
}

impl ToastQueue {
    /// Creates a queue whose non-loading toasts expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            ttl,
        }
    }

    /// Posts a toast with an explicit timestamp.
    pub fn push_at(&self, toast: Toast, at: Instant) {
        let mut entries = self.entries.lock();
        if let Some(key) = toast.key.as_deref() {
            entries.retain(|p| p.toast.key.as_deref() != Some(key));
        }
        entries.push(Posted { toast, at });
    }

    /// Drops expired toasts.
    pub fn prune(&self, now: Instant) {
        let ttl = self.ttl;
        self.entries.lock().retain(|p| {
            p.toast.level == ToastLevel::Loading || now.saturating_duration_since(p.at) < ttl
        });
    }

    /// Newest live toast, if any.
    #[must_use]
    pub fn latest(&self, now: Instant) -> Option<Toast> {
        self.prune(now);
        self.entries.lock().last().map(|p| p.toast.clone())
    }

    /// All live toasts, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Toast> {
        self.entries.lock().iter().map(|p| p.toast.clone()).collect()
    }

    /// Number of held toasts (including expired ones not yet pruned).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, toast: Toast) {
        tracing::debug!(level = ?toast.level, title = %toast.title, "toast");
        self.push_at(toast, Instant::now());
    }
}
