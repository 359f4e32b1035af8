//! Winners held back for operator review.
//!
//! An entry stays in the queue until an operator sets `"accepted": true` on
//! it and a later run processes it to completion. Unaccepted entries are
//! never touched by a run.

use crate::error::StateError;
use crate::tracking::{TrackingCollection, TrackingEntry};

/// Review state of an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredStatus {
    NotDeferred,
    Pending,
    Accepted,
}

#[derive(Debug, Clone)]
pub struct DeferredQueue {
    collection: TrackingCollection,
}

impl DeferredQueue {
    pub fn new(collection: TrackingCollection) -> Self {
        Self { collection }
    }

    pub fn collection(&self) -> &TrackingCollection {
        &self.collection
    }

    pub fn entries(&self) -> Vec<TrackingEntry> {
        self.collection.read()
    }

    pub fn status(&self, id: &str) -> DeferredStatus {
        let entries = self.collection.read();
        let mut matching = entries.iter().filter(|e| e.id == id).peekable();
        if matching.peek().is_none() {
            return DeferredStatus::NotDeferred;
        }
        if matching.any(|e| e.accepted == Some(true)) {
            DeferredStatus::Accepted
        } else {
            DeferredStatus::Pending
        }
    }

    /// Queue an entry for review. Returns false if the id is already queued,
    /// in which case the existing entry is left as it is.
    pub fn defer(&self, mut entry: TrackingEntry) -> Result<bool, StateError> {
        self.collection.update(|entries| {
            if entries.iter().any(|e| e.id == entry.id) {
                return false;
            }
            entry.set_accepted(false);
            entries.push(entry);
            true
        })
    }

    /// Set the acceptance marker on the given ids. Returns the ids that were
    /// found in the queue.
    pub fn accept(&self, ids: &[String]) -> Result<Vec<String>, StateError> {
        self.collection.update(|entries| {
            let mut found = Vec::new();
            for entry in entries.iter_mut().filter(|e| ids.contains(&e.id)) {
                entry.set_accepted(true);
                if !found.contains(&entry.id) {
                    found.push(entry.id.clone());
                }
            }
            found
        })
    }

    /// Drop an id after it was processed to completion, but only if the
    /// operator accepted it. Returns whether anything was removed.
    pub fn resolve(&self, id: &str) -> Result<bool, StateError> {
        if self.status(id) != DeferredStatus::Accepted {
            return Ok(false);
        }
        Ok(self.collection.remove_by_id(id)? > 0)
    }
}
