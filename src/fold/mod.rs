//! The common pending-update buffering,
//! tombstone handling, and insertion-order preservation contract shared
//! by every entity family, plus one module per family.

pub mod agents;
pub mod event_streams;
pub mod faves;
pub mod ghost_cursors;
pub mod messages;
pub mod permissions;
pub mod presence;
pub mod questions;
pub mod reactions;
pub mod roles;
pub mod sessions;
pub mod threads;

use std::collections::{HashMap, HashSet};

use crate::envelope::Envelope;

/// Bookkeeping shared by every per-entity fold: first-appearance
/// insertion order, a deleted-id set, and a pending-mutation buffer
/// keyed by entity id. The entity map itself stays in the caller's
/// hands since its value type differs per family.
pub(crate) struct EntityFold<T> {
    order: Vec<String>,
    seen: HashSet<String>,
    deleted: HashSet<String>,
    pending: HashMap<String, Vec<Envelope>>,
    map: HashMap<String, T>,
}

impl<T> EntityFold<T> {
    pub(crate) fn new() -> Self {
        Self {
            order: Vec::new(),
            seen: HashSet::new(),
            deleted: HashSet::new(),
            pending: HashMap::new(),
            map: HashMap::new(),
        }
    }

    /// Records first-appearance of a creation record. Reappearances
    /// (e.g. the same ID seen again on another machine) don't change
    /// the entity's position.
    pub(crate) fn note_created(&mut self, id: &str) {
        if self.seen.insert(id.to_string()) {
            self.order.push(id.to_string());
        }
    }

    pub(crate) fn is_deleted(&self, id: &str) -> bool {
        self.deleted.contains(id)
    }

    /// Marks an id as tombstoned and discards any buffered mutations —
    /// they must never be replayed once the id is dead.
    pub(crate) fn mark_deleted(&mut self, id: &str) {
        self.deleted.insert(id.to_string());
        self.pending.remove(id);
    }

    pub(crate) fn buffer_pending(&mut self, id: &str, env: Envelope) {
        self.pending.entry(id.to_string()).or_default().push(env);
    }

    pub(crate) fn take_pending(&mut self, id: &str) -> Vec<Envelope> {
        self.pending.remove(id).unwrap_or_default()
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.map.contains_key(id)
    }

    pub(crate) fn set(&mut self, id: &str, value: T) {
        self.map.insert(id.to_string(), value);
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.map.get_mut(id)
    }

    /// Drains the map in first-appearance order, dropping ids whose
    /// family deletes outright (they were removed from the map and so
    /// are simply absent here).
    pub(crate) fn finish(mut self) -> Vec<T> {
        self.order
            .into_iter()
            .filter_map(|id| self.map.remove(&id))
            .collect()
    }

    /// Drains the map sorted by id rather than by insertion order
    /// (agent descriptors).
    pub(crate) fn finish_sorted(self) -> Vec<T> {
        let mut ids: Vec<String> = self.map.keys().cloned().collect();
        ids.sort();
        let mut map = self.map;
        ids.into_iter().filter_map(|id| map.remove(&id)).collect()
    }
}
