//! # Task Board
//!
//! In-memory task list backed by the task endpoints. Follows the same
//! conventions as the client store: one backend call per operation, local
//! state changed only on success, outcome reported through the
//! [`Notifier`] and returned as a `bool`.
//!
//! Unlike the client list, a load lets the backend's copy of a task replace
//! the local one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use complai_core::{
    ComplianceBucket, NewTask, ReassignTask, Task, TaskId, TaskStatus, Urgency,
};
use serde::Serialize;

use crate::backend::TaskBackend;
use crate::notify::{Notifier, TracingNotifier};
use crate::repository::{InMemoryRepository, Repository};
use crate::LoadingGuard;

/// Criteria for [`TaskBoard::filter`]. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub bucket: Option<ComplianceBucket>,
    pub status: Option<TaskStatus>,
    /// Matched case-insensitively after trimming.
    pub assignee: Option<String>,
}

impl TaskFilter {
    pub fn bucket(mut self, bucket: ComplianceBucket) -> Self {
        self.bucket = Some(bucket);
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn matches(&self, task: &Task) -> bool {
        if let Some(bucket) = &self.bucket {
            if &task.bucket != bucket {
                return false;
            }
        }
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(assignee) = &self.assignee {
            if !task.assignee.trim().eq_ignore_ascii_case(assignee.trim()) {
                return false;
            }
        }
        true
    }
}

/// Task counts per [`Urgency`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgencySummary {
    pub overdue: usize,
    pub due_today: usize,
    pub due_soon: usize,
    pub upcoming: usize,
    pub done: usize,
}

impl UrgencySummary {
    pub fn add(&mut self, urgency: Urgency) {
        match urgency {
            Urgency::Overdue => self.overdue += 1,
            Urgency::DueToday => self.due_today += 1,
            Urgency::DueSoon => self.due_soon += 1,
            Urgency::Upcoming => self.upcoming += 1,
            Urgency::Done => self.done += 1,
        }
    }

    /// Tasks that still need work.
    pub fn open(&self) -> usize {
        self.overdue + self.due_today + self.due_soon + self.upcoming
    }

    pub fn total(&self) -> usize {
        self.open() + self.done
    }
}

/// Task list with API-backed create and reassign.
pub struct TaskBoard {
    tasks: InMemoryRepository<Task>,
    loading: AtomicBool,
    backend: Arc<dyn TaskBackend>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for TaskBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskBoard")
            .field("tasks", &self.tasks.len())
            .field("loading", &self.is_loading())
            .finish()
    }
}

impl TaskBoard {
    pub fn new(backend: Arc<dyn TaskBackend>) -> Self {
        Self {
            tasks: InMemoryRepository::new(),
            loading: AtomicBool::new(false),
            backend,
            notifier: Arc::new(TracingNotifier),
        }
    }

    pub fn with_notifier(self, notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier, ..self }
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.list()
    }

    pub fn get(&self, id: &TaskId) -> Option<Task> {
        self.tasks.get_by_id(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Tasks matching `filter`, in board order.
    pub fn filter(&self, filter: &TaskFilter) -> Vec<Task> {
        self.tasks.filter(|t| filter.matches(t))
    }

    pub fn by_bucket(&self, bucket: &ComplianceBucket) -> Vec<Task> {
        self.tasks.filter(|t| &t.bucket == bucket)
    }

    pub fn by_status(&self, status: TaskStatus) -> Vec<Task> {
        self.tasks.filter(|t| t.status == status)
    }

    pub fn by_assignee(&self, assignee: &str) -> Vec<Task> {
        self.filter(&TaskFilter::default().assignee(assignee))
    }

    /// Count tasks by urgency relative to `today`.
    pub fn urgency_summary(&self, today: NaiveDate) -> UrgencySummary {
        let mut summary = UrgencySummary::default();
        for task in self.tasks.list() {
            summary.add(Urgency::classify(task.due_date, today, task.status));
        }
        summary
    }

    /// Fetch every task. Backend records replace local ones with the same id.
    pub async fn load(&self) -> bool {
        let _guard = LoadingGuard::start(&self.loading);
        match self.backend.list_tasks().await {
            Ok(reply) => {
                let fetched = reply.data.len();
                for task in reply.data {
                    self.tasks.upsert(task);
                }
                tracing::info!(fetched, total = self.len(), "tasks loaded");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch tasks");
                self.notifier.error("Failed to load tasks", &e.user_message());
                false
            }
        }
    }

    /// Create a task through the backend and add the returned record.
    pub async fn create_via_api(&self, new: NewTask) -> bool {
        if let Err(e) = new.validate() {
            self.notifier.error("Invalid task", &e.to_string());
            return false;
        }
        match self.backend.create_task(&new).await {
            Ok(reply) => {
                let task = reply.data;
                let message = reply
                    .message
                    .unwrap_or_else(|| format!("{} was created", task.title));
                tracing::info!(task_id = %task.id, "task created");
                self.tasks.upsert(task);
                self.notifier.success("Task created", &message);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "task creation failed");
                self.notifier.error("Failed to create task", &e.user_message());
                false
            }
        }
    }

    /// Reassign a task through the backend and store the returned record.
    pub async fn reassign_via_api(&self, id: &TaskId, req: ReassignTask) -> bool {
        if req.assignee.trim().is_empty() {
            self.notifier.error("Invalid assignee", "assignee must not be empty");
            return false;
        }
        match self.backend.reassign_task(id, &req).await {
            Ok(reply) => {
                let task = reply.data;
                let message = reply
                    .message
                    .unwrap_or_else(|| format!("{} reassigned to {}", task.title, task.assignee));
                self.tasks.upsert(task);
                self.notifier.success("Task reassigned", &message);
                true
            }
            Err(e) => {
                tracing::warn!(task_id = %id, error = %e, "task reassignment failed");
                self.notifier
                    .error("Failed to reassign task", &e.user_message());
                false
            }
        }
    }
}
