//! Error types for network construction, parameterization, and evaluation.

use std::fmt;

/// The construction phase in which a vertex failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstructionStep {
    /// Setting the vertex's event set.
    Events,
    /// Resolving the vertex's ancestors and their event combinations.
    Ancestors,
}

impl fmt::Display for ConstructionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Events => write!(f, "events"),
            Self::Ancestors => write!(f, "ancestors"),
        }
    }
}

/// Errors that can occur while building or evaluating a network.
///
/// Vertex identifiers and events are rendered with their `Debug`
/// representation so the error type stays independent of the network's
/// type parameters.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum NetworkError {
    /// Malformed or empty structural input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An ancestor was referenced before it exists or before its events are set.
    #[error("vertex {vertex} depends on {dependency}: {reason}")]
    MissingDependency {
        /// The vertex whose dependency could not be resolved.
        vertex: String,
        /// The unresolved ancestor.
        dependency: String,
        /// Why the dependency is unusable.
        reason: String,
    },

    /// A CPT does not have the shape derived for its vertex.
    #[error("distribution shape mismatch for vertex {vertex}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// The vertex being parameterized.
        vertex: String,
        /// `(events, ancestor combinations)` derived from the structure.
        expected: (usize, usize),
        /// Shape of the rejected table.
        actual: (usize, usize),
    },

    /// An assignment gives a vertex an event outside its event set.
    #[error("unknown event {event} for vertex {vertex}")]
    UnknownEvent {
        /// The vertex with the bad assignment.
        vertex: String,
        /// The offending event.
        event: String,
    },

    /// An assignment gives an ancestor an event outside its event set.
    #[error("unknown ancestor combination {combination} for vertex {vertex}")]
    UnknownAncestorCombination {
        /// The vertex whose CPT column could not be located.
        vertex: String,
        /// The ancestor outcomes, in ancestor order.
        combination: String,
    },

    /// An assignment does not cover exactly the vertices it is evaluated
    /// against.
    #[error(
        "incomplete assignment: missing [{}], unexpected [{}]",
        .missing.join(", "),
        .unexpected.join(", ")
    )]
    IncompleteAssignment {
        /// The vertices without an assigned event.
        missing: Vec<String>,
        /// Assigned identifiers that are not vertices of the network.
        unexpected: Vec<String>,
    },

    /// Evaluation was attempted before the vertex received a CPT.
    #[error("vertex {0} has no distribution")]
    MissingDistribution(String),

    /// A CPT column does not sum to one within tolerance.
    #[error("distribution for vertex {vertex} is not normalized: column {column} sums to {sum}")]
    NotNormalized {
        /// The vertex owning the table.
        vertex: String,
        /// Index of the offending ancestor combination.
        column: usize,
        /// The observed column sum.
        sum: f64,
    },

    /// Network construction failed for a specific vertex and step.
    #[error("failed to build vertex {vertex} ({step}): {source}")]
    Construction {
        /// The vertex being built when the failure occurred.
        vertex: String,
        /// The construction phase that failed.
        step: ConstructionStep,
        /// The underlying failure.
        source: Box<NetworkError>,
    },
}

impl NetworkError {
    /// The innermost error, looking through any [`NetworkError::Construction`] wrapper.
    pub fn root_cause(&self) -> &NetworkError {
        match self {
            Self::Construction { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn construction(
        vertex: impl fmt::Debug,
        step: ConstructionStep,
        source: NetworkError,
    ) -> Self {
        Self::Construction {
            vertex: format!("{vertex:?}"),
            step,
            source: Box::new(source),
        }
    }
}

/// Convenience alias for network results.
pub type NetworkResult<T> = Result<T, NetworkError>;
