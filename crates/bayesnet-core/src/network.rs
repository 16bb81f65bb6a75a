//! The Bayesian network: vertex ownership, edge derivation, and joint
//! probability evaluation.
//!
//! [`Network`] is built in two phases. The structural phase
//! ([`Network::new`]) creates every [`Node`], sets its events, resolves its
//! ancestors and derives the descendant edges; it either succeeds completely
//! or returns no network at all. The parameterization phase
//! ([`Network::set_distributions`]) stores one CPT per vertex. Only a fully
//! parameterized network can evaluate [`Network::probability`].
//!
//! # Invariants
//!
//! - Vertex identifiers are unique.
//! - Every ancestor reference resolves to a vertex of the network.
//! - `descendants(a)` contains `b` exactly when `a` is an ancestor of `b`.
//!
//! Acyclicity of the ancestor relation is assumed, not verified.
//!
//! Evaluation takes `&self` and never mutates, so a network that is no
//! longer being modified can be shared across threads for concurrent
//! queries.

use std::collections::{BTreeMap, HashMap, VecDeque};

use ndarray::Array2;
use tracing::{debug, trace, warn};

use crate::assignment::Assignment;
use crate::config::NetworkConfig;
use crate::edges::invert;
use crate::error::{ConstructionStep, NetworkError, NetworkResult};
use crate::event::{Event, EventSpace, VertexId};
use crate::node::Node;

/// A discrete Bayesian network over vertices `V` with events `E`.
#[derive(Clone, Debug)]
pub struct Network<V: VertexId, E: Event> {
    /// All vertices, keyed and iterated by identifier.
    vertices: BTreeMap<V, Node<V, E>>,
    /// Forward-edge index: ancestor -> vertices conditioned on it.
    descendant_edges: BTreeMap<V, Vec<V>>,
    config: NetworkConfig,
}

impl<V: VertexId, E: Event> Network<V, E> {
    /// Build the network structure with the default configuration.
    ///
    /// See [`Network::with_config`].
    pub fn new(
        vertex_ids: impl IntoIterator<Item = V>,
        ancestors: &BTreeMap<V, Vec<V>>,
        events: &BTreeMap<V, Vec<E>>,
    ) -> NetworkResult<Self> {
        Self::with_config(vertex_ids, ancestors, events, NetworkConfig::default())
    }

    /// Build the network structure.
    ///
    /// Every vertex first receives its event set; ancestors are resolved in
    /// a second pass so that each ancestor's events already exist. A vertex
    /// with no entry in `ancestors` is a root.
    ///
    /// # Errors
    ///
    /// - [`NetworkError::InvalidInput`] for an invalid `config`, duplicate
    ///   vertex identifiers or an ancestor list keyed by an unknown vertex.
    /// - [`NetworkError::Construction`] naming the vertex and step that
    ///   failed, wrapping the underlying [`NetworkError::InvalidInput`] or
    ///   [`NetworkError::MissingDependency`].
    pub fn with_config(
        vertex_ids: impl IntoIterator<Item = V>,
        ancestors: &BTreeMap<V, Vec<V>>,
        events: &BTreeMap<V, Vec<E>>,
        config: NetworkConfig,
    ) -> NetworkResult<Self> {
        config.validate()?;
        let mut vertices: BTreeMap<V, Node<V, E>> = BTreeMap::new();

        for id in vertex_ids {
            if vertices.contains_key(&id) {
                return Err(NetworkError::InvalidInput(format!(
                    "duplicate vertex {id:?}"
                )));
            }
            let vertex_events = events.get(&id).ok_or_else(|| {
                NetworkError::construction(
                    &id,
                    ConstructionStep::Events,
                    NetworkError::InvalidInput("no event set supplied".into()),
                )
            })?;
            let mut node = Node::new(id.clone());
            node.set_events(vertex_events.iter().cloned())
                .map_err(|e| NetworkError::construction(&id, ConstructionStep::Events, e))?;
            vertices.insert(id, node);
        }

        if let Some(unknown) = ancestors.keys().find(|id| !vertices.contains_key(*id)) {
            return Err(NetworkError::InvalidInput(format!(
                "ancestors supplied for unknown vertex {unknown:?}"
            )));
        }

        let catalog: BTreeMap<V, EventSpace<E>> = vertices
            .iter()
            .map(|(id, node)| (id.clone(), node.event_space().clone()))
            .collect();

        for (id, node) in vertices.iter_mut() {
            let Some(ancestor_ids) = ancestors.get(id) else {
                continue;
            };
            node.set_ancestors(ancestor_ids.iter().cloned(), &catalog)
                .map_err(|e| NetworkError::construction(id, ConstructionStep::Ancestors, e))?;
        }

        let descendant_edges = invert(ancestors)?;

        debug!(
            vertices = vertices.len(),
            edges = descendant_edges.values().map(Vec::len).sum::<usize>(),
            "built network structure"
        );

        Ok(Self {
            vertices,
            descendant_edges,
            config,
        })
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if the network has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The network configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Retrieve a vertex by identifier.
    pub fn get(&self, id: &V) -> Option<&Node<V, E>> {
        self.vertices.get(id)
    }

    /// All vertex identifiers in sorted order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = &V> {
        self.vertices.keys()
    }

    /// All vertices in identifier order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<V, E>> {
        self.vertices.values()
    }

    // ---------------------------------------------------------------
    // Edges
    // ---------------------------------------------------------------

    /// The full descendant map derived from the ancestor declarations.
    pub fn descendant_edges(&self) -> &BTreeMap<V, Vec<V>> {
        &self.descendant_edges
    }

    /// Vertices directly conditioned on `id`.
    pub fn descendants(&self, id: &V) -> &[V] {
        self.descendant_edges
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Vertices without ancestors.
    pub fn roots(&self) -> Vec<&V> {
        self.vertices
            .values()
            .filter(|node| node.ancestors().is_empty())
            .map(Node::name)
            .collect()
    }

    /// All vertices with every ancestor listed before its descendants.
    ///
    /// Uses Kahn's algorithm seeded with the roots in identifier order.
    /// Vertices on a cycle never reach in-degree zero and are left out.
    pub fn topological_order(&self) -> Vec<&V> {
        let mut in_degree: HashMap<&V, usize> = self
            .vertices
            .iter()
            .map(|(id, node)| (id, node.ancestors().len()))
            .collect();

        let mut queue: VecDeque<&V> = self
            .vertices
            .iter()
            .filter(|(_, node)| node.ancestors().is_empty())
            .map(|(id, _)| id)
            .collect();

        let mut order = Vec::with_capacity(self.vertices.len());
        while let Some(current) = queue.pop_front() {
            order.push(current);
            for child in self.descendants(current) {
                if let Some(deg) = in_degree.get_mut(child) {
                    *deg -= 1;
                    if *deg == 0 {
                        queue.push_back(child);
                    }
                }
            }
        }

        order
    }

    // ---------------------------------------------------------------
    // Parameterization
    // ---------------------------------------------------------------

    /// Store one CPT per listed vertex, in identifier order.
    ///
    /// Stops at the first failure and returns it; vertices parameterized
    /// before the failure keep their tables. Returns the number of tables
    /// stored. Vertices absent from `tables` keep whatever they had; see
    /// [`set_all_distributions`](Self::set_all_distributions) for the
    /// variant that requires full coverage.
    pub fn set_distributions(&mut self, tables: BTreeMap<V, Array2<f64>>) -> NetworkResult<usize> {
        let uncovered = self
            .vertices
            .keys()
            .filter(|id| !tables.contains_key(*id))
            .count();
        let mut stored = 0;
        for (id, table) in tables {
            self.set_distribution(&id, table)?;
            stored += 1;
        }
        if uncovered > 0 {
            warn!(uncovered, "distribution map does not cover every vertex");
        }
        debug!(stored, total = self.vertices.len(), "stored distributions");
        Ok(stored)
    }

    /// Like [`set_distributions`](Self::set_distributions), but `tables`
    /// must hold a CPT for every vertex.
    ///
    /// Coverage is checked before anything is stored: a vertex without a
    /// table fails with [`NetworkError::MissingDistribution`] and leaves the
    /// network untouched.
    pub fn set_all_distributions(&mut self, tables: BTreeMap<V, Array2<f64>>) -> NetworkResult<usize> {
        if let Some(id) = self.vertices.keys().find(|id| !tables.contains_key(*id)) {
            return Err(NetworkError::MissingDistribution(format!("{id:?}")));
        }
        self.set_distributions(tables)
    }

    /// Store the CPT of a single vertex.
    ///
    /// When [`NetworkConfig::require_normalized`] is set, the table must
    /// also have every column summing to 1.
    pub fn set_distribution(&mut self, id: &V, table: Array2<f64>) -> NetworkResult<()> {
        let node = self.vertices.get_mut(id).ok_or_else(|| {
            NetworkError::InvalidInput(format!("distribution supplied for unknown vertex {id:?}"))
        })?;
        let result = if self.config.require_normalized {
            node.set_normalized_distribution(table, self.config.normalization_tolerance)
        } else {
            node.set_distribution(table)
        };
        if let Err(e) = &result {
            warn!(vertex = ?id, error = %e, "rejected distribution");
        }
        result
    }

    /// Returns `true` once every vertex has a CPT.
    pub fn is_parameterized(&self) -> bool {
        self.vertices.values().all(Node::has_distribution)
    }

    /// Check that every CPT column sums to 1 within the configured tolerance.
    pub fn validate_distributions(&self) -> NetworkResult<()> {
        let tolerance = self.config.normalization_tolerance;
        for node in self.vertices.values() {
            if let Err(e) = node.check_normalized(tolerance) {
                warn!(vertex = ?node.name(), error = %e, "distribution failed validation");
                return Err(e);
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // Evaluation
    // ---------------------------------------------------------------

    /// Joint probability of a full assignment: the product over all
    /// vertices of each vertex's conditional probability.
    ///
    /// Every factor is looked up before the product is returned, so an
    /// invalid assignment is always reported even when another factor is 0.
    ///
    /// # Errors
    ///
    /// - [`NetworkError::IncompleteAssignment`] unless the assignment covers
    ///   exactly the network's vertices, listing both the unassigned vertices
    ///   and the assigned identifiers that are not vertices.
    /// - Any per-vertex error from [`Node::probability`].
    pub fn probability<A: Assignment<V, E>>(&self, assignment: &A) -> NetworkResult<f64> {
        let factors = self.factors(assignment)?;
        let joint: f64 = factors.iter().product();
        trace!(joint, "evaluated joint probability");
        Ok(joint)
    }

    /// Natural logarithm of [`probability`](Self::probability), summed
    /// factor by factor. A zero factor yields negative infinity.
    pub fn log_probability<A: Assignment<V, E>>(&self, assignment: &A) -> NetworkResult<f64> {
        let factors = self.factors(assignment)?;
        let log_joint: f64 = factors.iter().map(|p| p.ln()).sum();
        trace!(log_joint, "evaluated joint log-probability");
        Ok(log_joint)
    }

    /// Each vertex's conditional probability under `assignment`, in
    /// identifier order.
    pub fn factors<A: Assignment<V, E>>(&self, assignment: &A) -> NetworkResult<Vec<f64>> {
        self.check_coverage(assignment)?;
        self.vertices
            .values()
            .map(|node| node.probability(assignment))
            .collect()
    }

    fn check_coverage<A: Assignment<V, E>>(&self, assignment: &A) -> NetworkResult<()> {
        let missing: Vec<String> = self
            .vertices
            .keys()
            .filter(|id| assignment.event_of(id).is_none())
            .map(|id| format!("{id:?}"))
            .collect();

        let mut unexpected = Vec::new();
        if assignment.assigned() + missing.len() != self.vertices.len() {
            unexpected = assignment
                .assigned_vertices()
                .into_iter()
                .filter(|id| !self.vertices.contains_key(*id))
                .map(|id| format!("{id:?}"))
                .collect();
            unexpected.sort();
        }

        if missing.is_empty() && unexpected.is_empty() {
            return Ok(());
        }
        Err(NetworkError::IncompleteAssignment {
            missing,
            unexpected,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use ndarray::array;
    use proptest::prelude::*;

    use super::*;

    type Net = Network<&'static str, u8>;

    fn events_of(entries: &[(&'static str, &[u8])]) -> BTreeMap<&'static str, Vec<u8>> {
        entries.iter().map(|(v, e)| (*v, e.to_vec())).collect()
    }

    fn ancestors_of(
        entries: &[(&'static str, &[&'static str])],
    ) -> BTreeMap<&'static str, Vec<&'static str>> {
        entries.iter().map(|(v, a)| (*v, a.to_vec())).collect()
    }

    fn assign(entries: &[(&'static str, u8)]) -> HashMap<&'static str, u8> {
        entries.iter().copied().collect()
    }

    /// A (events 0,1, uniform) -> B (events 0,1).
    /// P(B=0 | A=0) = 0.9, P(B=0 | A=1) = 0.2.
    fn rain_network() -> Net {
        let mut net = Network::new(
            ["A", "B"],
            &ancestors_of(&[("A", &[]), ("B", &["A"])]),
            &events_of(&[("A", &[0, 1]), ("B", &[0, 1])]),
        )
        .unwrap();
        let tables = BTreeMap::from([
            ("A", array![[0.5], [0.5]]),
            ("B", array![[0.9, 0.2], [0.1, 0.8]]),
        ]);
        assert_eq!(net.set_distributions(tables).unwrap(), 2);
        net
    }

    /// Diamond: A -> B, A -> C, (B, C) -> D with three events on C.
    fn diamond_network() -> Net {
        let mut net = Network::new(
            ["A", "B", "C", "D"],
            &ancestors_of(&[("B", &["A"]), ("C", &["A"]), ("D", &["C", "B"])]),
            &events_of(&[("A", &[0, 1]), ("B", &[0, 1]), ("C", &[0, 1, 2]), ("D", &[0, 1])]),
        )
        .unwrap();
        let tables = BTreeMap::from([
            ("A", array![[0.3], [0.7]]),
            ("B", array![[0.6, 0.1], [0.4, 0.9]]),
            ("C", array![[0.2, 0.5], [0.3, 0.25], [0.5, 0.25]]),
            (
                "D",
                array![
                    [0.1, 0.2, 0.3, 0.4, 0.5, 0.6],
                    [0.9, 0.8, 0.7, 0.6, 0.5, 0.4]
                ],
            ),
        ]);
        net.set_distributions(tables).unwrap();
        net
    }

    #[test]
    fn joint_probability_is_product_of_cells() {
        let net = rain_network();
        let p = net.probability(&assign(&[("A", 0), ("B", 0)])).unwrap();
        assert!((p - 0.45).abs() < 1e-12);

        let p = net.probability(&assign(&[("A", 1), ("B", 1)])).unwrap();
        assert!((p - 0.4).abs() < 1e-12);
    }

    #[test]
    fn joint_distribution_sums_to_one() {
        let net = diamond_network();
        let mut total = 0.0;
        for a in 0..2 {
            for b in 0..2 {
                for c in 0..3 {
                    for d in 0..2 {
                        total += net
                            .probability(&assign(&[("A", a), ("B", b), ("C", c), ("D", d)]))
                            .unwrap();
                    }
                }
            }
        }
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn diamond_uses_mixed_radix_columns() {
        let net = diamond_network();
        // D's ancestors are sorted to [B, C]; (B=1, C=2) is column 1*3 + 2 = 5.
        let p = net
            .probability(&assign(&[("A", 1), ("B", 1), ("C", 2), ("D", 0)]))
            .unwrap();
        assert!((p - 0.7 * 0.9 * 0.25 * 0.6).abs() < 1e-12);
        assert_eq!(net.get(&"D").unwrap().ancestors(), &["B", "C"]);
    }

    #[test]
    fn log_probability_matches_probability() {
        let net = diamond_network();
        let assignment = assign(&[("A", 0), ("B", 1), ("C", 0), ("D", 1)]);
        let p = net.probability(&assignment).unwrap();
        let lp = net.log_probability(&assignment).unwrap();
        assert!((lp.exp() - p).abs() < 1e-12);
    }

    #[test]
    fn zero_factor_gives_zero_joint() {
        let mut net = rain_network();
        net.set_distribution(&"B", array![[1.0, 0.2], [0.0, 0.8]]).unwrap();
        let assignment = assign(&[("A", 0), ("B", 1)]);
        assert_eq!(net.probability(&assignment).unwrap(), 0.0);
        assert_eq!(net.log_probability(&assignment).unwrap(), f64::NEG_INFINITY);
    }

    #[test]
    fn incomplete_assignment_is_rejected() {
        let net = rain_network();
        assert_eq!(
            net.probability(&assign(&[("A", 0)])),
            Err(NetworkError::IncompleteAssignment {
                missing: vec!["\"B\"".into()],
                unexpected: vec![],
            })
        );
    }

    #[test]
    fn extra_vertex_in_assignment_is_incomplete() {
        let net = rain_network();
        assert_eq!(
            net.probability(&assign(&[("A", 0), ("B", 0), ("Z", 0)])),
            Err(NetworkError::IncompleteAssignment {
                missing: vec![],
                unexpected: vec!["\"Z\"".into()],
            })
        );
        assert!((net.probability(&assign(&[("A", 0), ("B", 0)])).unwrap() - 0.45).abs() < 1e-12);
    }

    #[test]
    fn swapped_vertex_reports_both_sides() {
        let net = rain_network();
        let err = net.probability(&assign(&[("A", 0), ("Z", 0)])).unwrap_err();
        assert_eq!(
            err,
            NetworkError::IncompleteAssignment {
                missing: vec!["\"B\"".into()],
                unexpected: vec!["\"Z\"".into()],
            }
        );
        assert_eq!(
            err.to_string(),
            "incomplete assignment: missing [\"B\"], unexpected [\"Z\"]"
        );
    }

    #[test]
    fn unknown_event_is_rejected() {
        let net = rain_network();
        let result = net.probability(&assign(&[("A", 0), ("B", 5)]));
        assert!(matches!(result, Err(NetworkError::UnknownEvent { ref vertex, .. }) if vertex == "\"B\""));
    }

    #[test]
    fn unknown_event_is_reported_even_when_another_factor_is_zero() {
        let mut net = rain_network();
        net.set_distribution(&"A", array![[0.0], [1.0]]).unwrap();
        let result = net.probability(&assign(&[("A", 0), ("B", 5)]));
        assert!(matches!(result, Err(NetworkError::UnknownEvent { .. })));
    }

    #[test]
    fn unknown_ancestor_event_is_rejected() {
        let net = rain_network();
        // A's own lookup fails first since A is evaluated before B.
        let result = net.probability(&assign(&[("A", 3), ("B", 0)]));
        assert!(matches!(result, Err(NetworkError::UnknownEvent { .. })));

        let node = net.get(&"B").unwrap();
        let result = node.probability(&assign(&[("A", 3), ("B", 0)]));
        assert!(matches!(result, Err(NetworkError::UnknownAncestorCombination { .. })));
    }

    #[test]
    fn evaluation_before_parameterization_fails() {
        let net: Net = Network::new(
            ["A"],
            &BTreeMap::new(),
            &events_of(&[("A", &[0, 1])]),
        )
        .unwrap();
        assert!(!net.is_parameterized());
        assert!(matches!(
            net.probability(&assign(&[("A", 0)])),
            Err(NetworkError::MissingDistribution(_))
        ));
    }

    #[test]
    fn missing_ancestor_aborts_construction() {
        let result: NetworkResult<Net> = Network::new(
            ["A", "B"],
            &ancestors_of(&[("B", &["A", "Q"])]),
            &events_of(&[("A", &[0, 1]), ("B", &[0, 1])]),
        );
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            NetworkError::Construction { ref vertex, step: ConstructionStep::Ancestors, .. } if vertex == "\"B\""
        ));
        assert!(matches!(err.root_cause(), NetworkError::MissingDependency { .. }));
    }

    #[test]
    fn empty_event_set_aborts_construction() {
        let result: NetworkResult<Net> = Network::new(
            ["A"],
            &BTreeMap::new(),
            &events_of(&[("A", &[])]),
        );
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            NetworkError::Construction { step: ConstructionStep::Events, .. }
        ));
        assert!(matches!(err.root_cause(), NetworkError::InvalidInput(_)));
    }

    #[test]
    fn missing_event_entry_aborts_construction() {
        let result: NetworkResult<Net> = Network::new(
            ["A", "B"],
            &BTreeMap::new(),
            &events_of(&[("A", &[0, 1])]),
        );
        assert!(matches!(
            result.unwrap_err().root_cause(),
            NetworkError::InvalidInput(_)
        ));
    }

    #[test]
    fn duplicate_vertex_is_rejected() {
        let result: NetworkResult<Net> = Network::new(
            ["A", "A"],
            &BTreeMap::new(),
            &events_of(&[("A", &[0, 1])]),
        );
        assert!(matches!(result, Err(NetworkError::InvalidInput(_))));
    }

    #[test]
    fn ancestors_for_unknown_vertex_are_rejected() {
        let result: NetworkResult<Net> = Network::new(
            ["A"],
            &ancestors_of(&[("Z", &["A"])]),
            &events_of(&[("A", &[0, 1])]),
        );
        assert!(matches!(result, Err(NetworkError::InvalidInput(_))));
    }

    #[test]
    fn self_ancestor_aborts_construction() {
        let result: NetworkResult<Net> = Network::new(
            ["A"],
            &ancestors_of(&[("A", &["A"])]),
            &events_of(&[("A", &[0, 1])]),
        );
        assert!(matches!(
            result.unwrap_err().root_cause(),
            NetworkError::InvalidInput(_)
        ));
    }

    #[test]
    fn descendant_edges_invert_ancestors() {
        let net = diamond_network();
        assert_eq!(net.descendants(&"A"), &["B", "C"]);
        assert_eq!(net.descendants(&"B"), &["D"]);
        assert_eq!(net.descendants(&"C"), &["D"]);
        assert!(net.descendants(&"D").is_empty());
        assert_eq!(net.roots(), vec![&"A"]);
    }

    #[test]
    fn topological_order_puts_ancestors_first() {
        let net = diamond_network();
        let order = net.topological_order();
        assert_eq!(order, vec![&"A", &"B", &"C", &"D"]);
    }

    #[test]
    fn topological_order_skips_cycles() {
        let net: Net = Network::new(
            ["A", "B", "C"],
            &ancestors_of(&[("A", &["B"]), ("B", &["A"])]),
            &events_of(&[("A", &[0, 1]), ("B", &[0, 1]), ("C", &[0])]),
        )
        .unwrap();
        assert_eq!(net.topological_order(), vec![&"C"]);
    }

    #[test]
    fn shape_mismatch_stops_but_keeps_earlier_tables() {
        let mut net: Net = Network::new(
            ["A", "B", "C"],
            &ancestors_of(&[("B", &["A"])]),
            &events_of(&[("A", &[0, 1]), ("B", &[0, 1]), ("C", &[0, 1])]),
        )
        .unwrap();
        let tables = BTreeMap::from([
            ("A", array![[0.5], [0.5]]),
            ("B", array![[0.5], [0.5]]),
            ("C", array![[0.5], [0.5]]),
        ]);
        let err = net.set_distributions(tables).unwrap_err();
        assert_eq!(
            err,
            NetworkError::ShapeMismatch {
                vertex: "\"B\"".into(),
                expected: (2, 2),
                actual: (2, 1),
            }
        );
        assert!(net.get(&"A").unwrap().has_distribution());
        assert!(!net.get(&"B").unwrap().has_distribution());
        assert!(!net.get(&"C").unwrap().has_distribution());
    }

    #[test]
    fn partial_distribution_map_leaves_network_unparameterized() {
        let mut net: Net = Network::new(
            ["A", "B"],
            &ancestors_of(&[("B", &["A"])]),
            &events_of(&[("A", &[0, 1]), ("B", &[0, 1])]),
        )
        .unwrap();
        let tables = BTreeMap::from([("A", array![[0.5], [0.5]])]);
        assert_eq!(net.set_distributions(tables).unwrap(), 1);
        assert!(!net.is_parameterized());
    }

    #[test]
    fn set_all_distributions_requires_every_vertex() {
        let mut net: Net = Network::new(
            ["A", "B"],
            &ancestors_of(&[("B", &["A"])]),
            &events_of(&[("A", &[0, 1]), ("B", &[0, 1])]),
        )
        .unwrap();
        let partial = BTreeMap::from([("A", array![[0.5], [0.5]])]);
        assert_eq!(
            net.set_all_distributions(partial),
            Err(NetworkError::MissingDistribution("\"B\"".into()))
        );
        assert!(!net.get(&"A").unwrap().has_distribution());

        let full = BTreeMap::from([
            ("A", array![[0.5], [0.5]]),
            ("B", array![[0.9, 0.2], [0.1, 0.8]]),
        ]);
        assert_eq!(net.set_all_distributions(full).unwrap(), 2);
        assert!(net.is_parameterized());
    }

    #[test]
    fn invalid_config_aborts_construction() {
        let config = NetworkConfig {
            normalization_tolerance: f64::NAN,
            ..Default::default()
        };
        let result: NetworkResult<Net> = Network::with_config(
            ["A"],
            &BTreeMap::new(),
            &events_of(&[("A", &[0, 1])]),
            config,
        );
        assert!(matches!(result, Err(NetworkError::InvalidInput(_))));
    }

    #[test]
    fn distribution_for_unknown_vertex_is_rejected() {
        let mut net = rain_network();
        let result = net.set_distribution(&"Z", array![[1.0]]);
        assert!(matches!(result, Err(NetworkError::InvalidInput(_))));
    }

    #[test]
    fn strict_config_rejects_unnormalized_tables() {
        let mut net: Net = Network::with_config(
            ["A"],
            &BTreeMap::new(),
            &events_of(&[("A", &[0, 1])]),
            NetworkConfig::strict(),
        )
        .unwrap();
        let result = net.set_distribution(&"A", array![[0.5], [0.4]]);
        assert!(matches!(result, Err(NetworkError::NotNormalized { .. })));
        net.set_distribution(&"A", array![[0.5], [0.5]]).unwrap();
        assert!(net.is_parameterized());
    }

    #[test]
    fn validate_distributions_reports_bad_column() {
        let mut net = rain_network();
        assert!(net.validate_distributions().is_ok());
        net.set_distribution(&"B", array![[0.9, 0.2], [0.1, 0.7]]).unwrap();
        assert!(matches!(
            net.validate_distributions(),
            Err(NetworkError::NotNormalized { column: 1, .. })
        ));
    }

    #[test]
    fn btree_and_hash_assignments_agree() {
        let net = diamond_network();
        let hashed = assign(&[("D", 1), ("A", 0), ("C", 2), ("B", 0)]);
        let ordered: BTreeMap<&str, u8> = hashed.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(
            net.probability(&hashed).unwrap(),
            net.probability(&ordered).unwrap()
        );
    }

    #[test]
    fn network_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Network<String, u8>>();
    }

    #[test]
    fn vertex_ids_are_sorted() {
        let net = diamond_network();
        let ids: BTreeSet<_> = net.vertex_ids().collect();
        assert_eq!(ids.len(), net.len());
        assert_eq!(net.vertex_ids().collect::<Vec<_>>(), vec![&"A", &"B", &"C", &"D"]);
        assert_eq!(net.nodes().count(), 4);
    }

    proptest! {
        #[test]
        fn probability_ignores_assignment_order(
            a in 0u8..2, b in 0u8..2, c in 0u8..3, d in 0u8..2,
            order in Just(vec![0usize, 1, 2, 3]).prop_shuffle(),
        ) {
            let net = diamond_network();
            let entries = [("A", a), ("B", b), ("C", c), ("D", d)];
            let reference = net.probability(&assign(&entries)).unwrap();

            let mut shuffled = HashMap::new();
            for i in order {
                shuffled.insert(entries[i].0, entries[i].1);
            }
            prop_assert_eq!(net.probability(&shuffled).unwrap(), reference);
        }
    }
}
