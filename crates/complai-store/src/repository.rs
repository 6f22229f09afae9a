//! # Record Repository
//!
//! A typed, insertion-ordered collection of records keyed by id. Both the
//! client store and the task board keep their records here instead of
//! splicing arrays by hand.
//!
//! All operations are synchronous. The lock is `parking_lot::RwLock` and is
//! never held across an `.await`, so callers may use the repository freely
//! from async code.

use std::sync::Arc;

use complai_core::{Client, ClientId, Comment, CommentId, DocumentId, Task, TaskDocument, TaskId};
use parking_lot::RwLock;

/// A record with a stable identifier.
pub trait Record: Clone + Send + Sync + 'static {
    type Id: PartialEq + Clone + Send + Sync + std::fmt::Debug;

    fn id(&self) -> &Self::Id;
}

impl Record for Client {
    type Id = ClientId;

    fn id(&self) -> &ClientId {
        &self.id
    }
}

impl Record for Task {
    type Id = TaskId;

    fn id(&self) -> &TaskId {
        &self.id
    }
}

impl Record for Comment {
    type Id = CommentId;

    fn id(&self) -> &CommentId {
        &self.id
    }
}

impl Record for TaskDocument {
    type Id = DocumentId;

    fn id(&self) -> &DocumentId {
        &self.id
    }
}

/// Read/write access to a collection of records.
pub trait Repository<T: Record>: Send + Sync {
    /// All records, in insertion order.
    fn list(&self) -> Vec<T>;

    /// Look up a record by id.
    fn get_by_id(&self, id: &T::Id) -> Option<T>;

    /// Replace the record with the same id in place, or append it.
    /// Returns the replaced record, if any.
    fn upsert(&self, record: T) -> Option<T>;

    /// Remove a record, returning it.
    fn remove(&self, id: &T::Id) -> Option<T>;

    /// Whether a record with this id is held.
    fn contains(&self, id: &T::Id) -> bool {
        self.get_by_id(id).is_some()
    }
}

/// Thread-safe, cloneable in-memory repository. Clones share storage.
#[derive(Debug)]
pub struct InMemoryRepository<T: Record> {
    records: Arc<RwLock<Vec<T>>>,
}

impl<T: Record> Clone for InMemoryRepository<T> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<T: Record> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> InMemoryRepository<T> {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::seeded(Vec::new())
    }

    /// Create a repository holding `records`. Later duplicates of an id
    /// replace earlier ones without changing position.
    pub fn seeded(records: Vec<T>) -> Self {
        let repo = Self {
            records: Arc::new(RwLock::new(Vec::with_capacity(records.len()))),
        };
        for record in records {
            repo.upsert(record);
        }
        repo
    }

    /// Mutate a record in place. Returns the updated record, or `None` if
    /// the id is not held.
    pub fn update(&self, id: &T::Id, f: impl FnOnce(&mut T)) -> Option<T> {
        let mut guard = self.records.write();
        let record = guard.iter_mut().find(|r| r.id() == id)?;
        f(record);
        Some(record.clone())
    }

    /// Append every record whose id is not already held. Returns how many
    /// were added.
    pub fn insert_missing(&self, incoming: impl IntoIterator<Item = T>) -> usize {
        let mut guard = self.records.write();
        let mut added = 0;
        for record in incoming {
            if !guard.iter().any(|r| r.id() == record.id()) {
                guard.push(record);
                added += 1;
            }
        }
        added
    }

    /// Records matching a predicate, in insertion order.
    pub fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.records.read().iter().filter(|r| pred(r)).cloned().collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the repository is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Record> Repository<T> for InMemoryRepository<T> {
    fn list(&self) -> Vec<T> {
        self.records.read().clone()
    }

    fn get_by_id(&self, id: &T::Id) -> Option<T> {
        self.records.read().iter().find(|r| r.id() == id).cloned()
    }

    fn upsert(&self, record: T) -> Option<T> {
        let mut guard = self.records.write();
        match guard.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => Some(std::mem::replace(slot, record)),
            None => {
                guard.push(record);
                None
            }
        }
    }

    fn remove(&self, id: &T::Id) -> Option<T> {
        let mut guard = self.records.write();
        let pos = guard.iter().position(|r| r.id() == id)?;
        Some(guard.remove(pos))
    }
}
