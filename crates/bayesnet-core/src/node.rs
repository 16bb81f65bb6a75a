//! A single random variable and its conditional probability table.
//!
//! A [`Node`] maps an assignment to one CPT cell in constant time. Its own
//! event is located through its [`EventSpace`]; the ancestor outcomes are
//! located through a snapshot of each ancestor's event space and combined
//! with mixed-radix strides, so the column index of an ancestor tuple is
//! computed arithmetically instead of by hashing the tuple.
//!
//! The column order matches [`Node::ancestor_event_tuples`]: the Cartesian
//! product of the ancestors' sorted events in ancestor order, with the last
//! ancestor varying fastest.

use std::collections::BTreeMap;

use itertools::Itertools;
use ndarray::{Array1, Array2, Axis};
use tracing::debug;

use crate::assignment::Assignment;
use crate::error::{NetworkError, NetworkResult};
use crate::event::{Event, EventSpace, VertexId};

/// One vertex of a Bayesian network.
#[derive(Clone, Debug, PartialEq)]
pub struct Node<V: VertexId, E: Event> {
    name: V,
    events: EventSpace<E>,
    /// Sorted, deduplicated ancestor identifiers.
    ancestors: Vec<V>,
    /// Event space of each ancestor, parallel to `ancestors`.
    ancestor_spaces: Vec<EventSpace<E>>,
    /// Mixed-radix weight of each ancestor's event position.
    strides: Vec<usize>,
    ancestor_event_tuples: Vec<Vec<E>>,
    /// Indexed `[event][ancestor combination]`.
    cpt: Option<Array2<f64>>,
}

impl<V: VertexId, E: Event> Node<V, E> {
    /// Create a vertex with no events, no ancestors and no distribution.
    pub fn new(name: V) -> Self {
        Self {
            name,
            events: EventSpace::default(),
            ancestors: Vec::new(),
            ancestor_spaces: Vec::new(),
            strides: Vec::new(),
            ancestor_event_tuples: vec![Vec::new()],
            cpt: None,
        }
    }

    /// The vertex identifier.
    pub fn name(&self) -> &V {
        &self.name
    }

    /// The vertex's events in sorted order.
    pub fn events(&self) -> &[E] {
        self.events.events()
    }

    /// The vertex's indexed event space.
    pub fn event_space(&self) -> &EventSpace<E> {
        &self.events
    }

    /// The ancestor identifiers in sorted order.
    pub fn ancestors(&self) -> &[V] {
        &self.ancestors
    }

    /// Every combination of ancestor outcomes, in CPT column order.
    pub fn ancestor_event_tuples(&self) -> &[Vec<E>] {
        &self.ancestor_event_tuples
    }

    /// The stored CPT, if any.
    pub fn distribution(&self) -> Option<&Array2<f64>> {
        self.cpt.as_ref()
    }

    /// Returns `true` once a CPT has been stored.
    pub fn has_distribution(&self) -> bool {
        self.cpt.is_some()
    }

    /// Replace the vertex's event set.
    ///
    /// Events are deduplicated and sorted. Any stored CPT is discarded since
    /// its shape no longer applies. Fails with
    /// [`NetworkError::InvalidInput`] if `events` is empty.
    pub fn set_events(&mut self, events: impl IntoIterator<Item = E>) -> NetworkResult<()> {
        let space = EventSpace::new(events);
        if space.is_empty() {
            return Err(NetworkError::InvalidInput(format!(
                "vertex {:?} has an empty event set",
                self.name
            )));
        }
        self.events = space;
        self.clear_distribution();
        Ok(())
    }

    /// Replace the vertex's ancestors.
    ///
    /// `catalog` supplies the event space of every vertex known so far; each
    /// ancestor's events are copied from it, so ancestors must have their
    /// events set before this call. The node is left unchanged on failure.
    ///
    /// # Errors
    ///
    /// - [`NetworkError::InvalidInput`] if the vertex names itself, or the
    ///   number of ancestor combinations overflows `usize`.
    /// - [`NetworkError::MissingDependency`] if an ancestor is absent from
    ///   `catalog` or its event space is empty.
    pub fn set_ancestors(
        &mut self,
        ancestor_ids: impl IntoIterator<Item = V>,
        catalog: &BTreeMap<V, EventSpace<E>>,
    ) -> NetworkResult<()> {
        let mut ancestors: Vec<V> = ancestor_ids.into_iter().collect();
        ancestors.sort();
        ancestors.dedup();

        let mut spaces = Vec::with_capacity(ancestors.len());
        for ancestor in &ancestors {
            if *ancestor == self.name {
                return Err(NetworkError::InvalidInput(format!(
                    "vertex {:?} lists itself as an ancestor",
                    self.name
                )));
            }
            let space = catalog
                .get(ancestor)
                .ok_or_else(|| self.missing(ancestor, "not a vertex of the network"))?;
            if space.is_empty() {
                return Err(self.missing(ancestor, "events not set"));
            }
            spaces.push(space.clone());
        }

        let mut strides = vec![0; spaces.len()];
        let mut combinations: usize = 1;
        for (stride, space) in strides.iter_mut().zip(&spaces).rev() {
            *stride = combinations;
            combinations = combinations.checked_mul(space.len()).ok_or_else(|| {
                NetworkError::InvalidInput(format!(
                    "vertex {:?} has too many ancestor combinations",
                    self.name
                ))
            })?;
        }

        let tuples: Vec<Vec<E>> = if spaces.is_empty() {
            vec![Vec::new()]
        } else {
            spaces
                .iter()
                .map(|space| space.events().iter().cloned())
                .multi_cartesian_product()
                .collect()
        };
        debug_assert_eq!(tuples.len(), combinations);

        debug!(
            vertex = ?self.name,
            ancestors = ancestors.len(),
            combinations,
            "resolved ancestor combinations"
        );

        self.ancestors = ancestors;
        self.ancestor_spaces = spaces;
        self.strides = strides;
        self.ancestor_event_tuples = tuples;
        self.clear_distribution();
        Ok(())
    }

    /// The exact `(events, ancestor combinations)` shape the CPT must have.
    pub fn distribution_shape(&self) -> (usize, usize) {
        (self.events.len(), self.ancestor_event_tuples.len())
    }

    /// Store a CPT indexed `[event][ancestor combination]`.
    ///
    /// # Errors
    ///
    /// - [`NetworkError::ShapeMismatch`] if `table` does not have
    ///   [`distribution_shape`](Self::distribution_shape).
    /// - [`NetworkError::InvalidInput`] if an entry lies outside `[0, 1]`.
    pub fn set_distribution(&mut self, table: Array2<f64>) -> NetworkResult<()> {
        self.check_table(&table)?;
        self.cpt = Some(table);
        debug!(vertex = ?self.name, shape = ?self.distribution_shape(), "stored distribution");
        Ok(())
    }

    /// Store a CPT after also checking that every column sums to 1 within
    /// `tolerance`.
    pub fn set_normalized_distribution(
        &mut self,
        table: Array2<f64>,
        tolerance: f64,
    ) -> NetworkResult<()> {
        self.check_table(&table)?;
        self.check_columns(&table, tolerance)?;
        self.cpt = Some(table);
        debug!(vertex = ?self.name, shape = ?self.distribution_shape(), "stored normalized distribution");
        Ok(())
    }

    /// Sum of each CPT column, one entry per ancestor combination.
    pub fn column_sums(&self) -> Option<Array1<f64>> {
        self.cpt.as_ref().map(|cpt| cpt.sum_axis(Axis(0)))
    }

    /// Verify that the stored CPT is a proper conditional distribution.
    pub fn check_normalized(&self, tolerance: f64) -> NetworkResult<()> {
        let cpt = self.cpt.as_ref().ok_or_else(|| self.no_distribution())?;
        self.check_columns(cpt, tolerance)
    }

    /// Column of the CPT for a tuple of ancestor outcomes in ancestor order.
    ///
    /// Returns `None` if the tuple has the wrong length or contains an event
    /// outside the corresponding ancestor's event set.
    pub fn ancestor_tuple_index(&self, tuple: &[E]) -> Option<usize> {
        let refs: Vec<&E> = tuple.iter().collect();
        self.column_of(&refs)
    }

    /// Conditional probability of this vertex's assigned event given its
    /// ancestors' assigned events.
    ///
    /// # Errors
    ///
    /// - [`NetworkError::MissingDistribution`] if no CPT has been stored.
    /// - [`NetworkError::IncompleteAssignment`] if this vertex or one of its
    ///   ancestors has no assigned event.
    /// - [`NetworkError::UnknownEvent`] if the vertex's own event is not in
    ///   its event set.
    /// - [`NetworkError::UnknownAncestorCombination`] if an ancestor's event
    ///   is outside that ancestor's event set.
    pub fn probability<A: Assignment<V, E>>(&self, assignment: &A) -> NetworkResult<f64> {
        let cpt = self.cpt.as_ref().ok_or_else(|| self.no_distribution())?;

        let own = assignment
            .event_of(&self.name)
            .ok_or_else(|| NetworkError::IncompleteAssignment {
                missing: vec![format!("{:?}", self.name)],
                unexpected: Vec::new(),
            })?;
        let row = self
            .events
            .index_of(own)
            .ok_or_else(|| NetworkError::UnknownEvent {
                vertex: format!("{:?}", self.name),
                event: format!("{own:?}"),
            })?;

        let mut chosen = Vec::with_capacity(self.ancestors.len());
        let mut missing = Vec::new();
        for ancestor in &self.ancestors {
            match assignment.event_of(ancestor) {
                Some(event) => chosen.push(event),
                None => missing.push(format!("{ancestor:?}")),
            }
        }
        if !missing.is_empty() {
            return Err(NetworkError::IncompleteAssignment {
                missing,
                unexpected: Vec::new(),
            });
        }

        let column =
            self.column_of(&chosen)
                .ok_or_else(|| NetworkError::UnknownAncestorCombination {
                    vertex: format!("{:?}", self.name),
                    combination: format!("{chosen:?}"),
                })?;

        Ok(cpt[[row, column]])
    }

    fn column_of(&self, chosen: &[&E]) -> Option<usize> {
        if chosen.len() != self.ancestors.len() {
            return None;
        }
        chosen
            .iter()
            .zip(self.ancestor_spaces.iter().zip(&self.strides))
            .try_fold(0, |column, (event, (space, stride))| {
                space.index_of(event).map(|pos| column + pos * stride)
            })
    }

    fn check_table(&self, table: &Array2<f64>) -> NetworkResult<()> {
        let expected = self.distribution_shape();
        let actual = table.dim();
        if actual != expected {
            return Err(NetworkError::ShapeMismatch {
                vertex: format!("{:?}", self.name),
                expected,
                actual,
            });
        }
        if let Some(bad) = table.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            return Err(NetworkError::InvalidInput(format!(
                "vertex {:?} has probability {bad} outside [0, 1]",
                self.name
            )));
        }
        Ok(())
    }

    fn check_columns(&self, table: &Array2<f64>, tolerance: f64) -> NetworkResult<()> {
        for (column, sum) in table.sum_axis(Axis(0)).iter().enumerate() {
            if (sum - 1.0).abs() > tolerance {
                return Err(NetworkError::NotNormalized {
                    vertex: format!("{:?}", self.name),
                    column,
                    sum: *sum,
                });
            }
        }
        Ok(())
    }

    fn clear_distribution(&mut self) {
        if self.cpt.take().is_some() {
            debug!(vertex = ?self.name, "discarded distribution after structural change");
        }
    }

    fn missing(&self, ancestor: &V, reason: &str) -> NetworkError {
        NetworkError::MissingDependency {
            vertex: format!("{:?}", self.name),
            dependency: format!("{ancestor:?}"),
            reason: reason.to_string(),
        }
    }

    fn no_distribution(&self) -> NetworkError {
        NetworkError::MissingDistribution(format!("{:?}", self.name))
    }
}
