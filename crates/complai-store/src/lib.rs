//! # complai-store — Client Store and Task Board
//!
//! Local state for the ComplAI dashboard: the client list with its
//! current-client selection, and the task board. Both sit on an
//! insertion-ordered [`InMemoryRepository`] and reach the REST backend
//! through the [`ClientBackend`] / [`TaskBackend`] seams, which the typed
//! HTTP client implements.
//!
//! ## Concurrency
//!
//! State lives behind `parking_lot` locks that are never held across an
//! `.await`. Concurrent writers are last-write-wins.

pub mod backend;
pub mod client_store;
pub mod fixtures;
pub mod notify;
pub mod repository;
pub mod task_board;

pub use backend::{ClientBackend, TaskBackend};
pub use client_store::ClientStore;
pub use notify::{Notification, NotificationLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use repository::{InMemoryRepository, Record, Repository};
pub use task_board::{TaskBoard, TaskFilter, UrgencySummary};

use std::sync::atomic::{AtomicBool, Ordering};

/// Holds a loading flag up for the duration of a fetch, including when the
/// fetch future is dropped early.
pub(crate) struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    pub(crate) fn start(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
