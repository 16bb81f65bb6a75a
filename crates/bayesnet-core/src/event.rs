//! Vertex identifiers, events, and indexed event sets.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// A value naming a vertex within a network.
///
/// Implemented for every hashable, totally-ordered type, so plain integers
/// and strings work directly.
pub trait VertexId: Clone + Ord + Hash + fmt::Debug {}

impl<T: Clone + Ord + Hash + fmt::Debug> VertexId for T {}

/// A possible outcome of a vertex.
pub trait Event: Clone + Ord + Hash + fmt::Debug {}

impl<T: Clone + Ord + Hash + fmt::Debug> Event for T {}

/// A sorted, deduplicated event set together with its `event -> position`
/// index.
///
/// The index is only ever built alongside the sequence, so the two cannot
/// drift apart. An empty space means the owning vertex has not had its
/// events set yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventSpace<E: Event> {
    events: Vec<E>,
    index: HashMap<E, usize>,
}

impl<E: Event> Default for EventSpace<E> {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<E: Event> EventSpace<E> {
    /// Build a space from arbitrary events: sorted, duplicates dropped.
    pub fn new(events: impl IntoIterator<Item = E>) -> Self {
        let mut events: Vec<E> = events.into_iter().collect();
        events.sort();
        events.dedup();
        let index = events
            .iter()
            .enumerate()
            .map(|(pos, event)| (event.clone(), pos))
            .collect();
        Self { events, index }
    }

    /// Number of distinct events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if no events have been set.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The events in sorted order.
    pub fn events(&self) -> &[E] {
        &self.events
    }

    /// Position of `event` in [`events`](Self::events).
    pub fn index_of(&self, event: &E) -> Option<usize> {
        self.index.get(event).copied()
    }

    /// Returns `true` if `event` belongs to this space.
    pub fn contains(&self, event: &E) -> bool {
        self.index.contains_key(event)
    }
}
