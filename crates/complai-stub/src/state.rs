//! In-memory storage for the stub backend.
//!
//! Each resource gets its own insertion-ordered repository. Nothing is
//! persisted; data is lost on restart.

use std::sync::Arc;

use complai_core::{Client, Comment, Task, TaskDocument};
use complai_store::fixtures::demo_clients;
use complai_store::InMemoryRepository;

struct Inner {
    clients: InMemoryRepository<Client>,
    tasks: InMemoryRepository<Task>,
    comments: InMemoryRepository<Comment>,
    documents: InMemoryRepository<TaskDocument>,
}

/// Shared application state. Clones share the same data.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Empty backend.
    pub fn new() -> Self {
        Self::with_clients(Vec::new())
    }

    /// Backend pre-loaded with the demo client list.
    pub fn with_demo_data() -> Self {
        Self::with_clients(demo_clients())
    }

    fn with_clients(clients: Vec<Client>) -> Self {
        Self {
            inner: Arc::new(Inner {
                clients: InMemoryRepository::seeded(clients),
                tasks: InMemoryRepository::new(),
                comments: InMemoryRepository::new(),
                documents: InMemoryRepository::new(),
            }),
        }
    }

    pub fn clients(&self) -> &InMemoryRepository<Client> {
        &self.inner.clients
    }

    pub fn tasks(&self) -> &InMemoryRepository<Task> {
        &self.inner.tasks
    }

    pub fn comments(&self) -> &InMemoryRepository<Comment> {
        &self.inner.comments
    }

    pub fn documents(&self) -> &InMemoryRepository<TaskDocument> {
        &self.inner.documents
    }
}
