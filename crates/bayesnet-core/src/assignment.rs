//! Full assignments of events to vertices.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// A mapping from vertex identifier to the event chosen for it.
///
/// Lookups are by key only, so evaluation never depends on the order in
/// which entries were inserted.
pub trait Assignment<V, E> {
    /// The event assigned to `vertex`, if any.
    fn event_of(&self, vertex: &V) -> Option<&E>;

    /// Number of assigned vertices.
    fn assigned(&self) -> usize;

    /// Every assigned vertex, in the mapping's own iteration order.
    fn assigned_vertices(&self) -> Vec<&V>;
}

impl<V: Eq + Hash, E> Assignment<V, E> for HashMap<V, E> {
    fn event_of(&self, vertex: &V) -> Option<&E> {
        self.get(vertex)
    }

    fn assigned(&self) -> usize {
        self.len()
    }

    fn assigned_vertices(&self) -> Vec<&V> {
        self.keys().collect()
    }
}

impl<V: Ord, E> Assignment<V, E> for BTreeMap<V, E> {
    fn event_of(&self, vertex: &V) -> Option<&E> {
        self.get(vertex)
    }

    fn assigned(&self) -> usize {
        self.len()
    }

    fn assigned_vertices(&self) -> Vec<&V> {
        self.keys().collect()
    }
}
