//! Discrete Bayesian networks.
//!
//! A [`Network`] is a directed acyclic graph of random variables. Each
//! vertex ([`Node`]) has a finite set of events and a conditional
//! probability table (CPT) giving the probability of each of its events for
//! every combination of its ancestors' events. The joint probability of a
//! complete assignment is the product of every vertex's CPT cell.
//!
//! # Key Types
//!
//! - [`Network`] — Owns the vertices, derives descendant edges, evaluates joint probabilities
//! - [`Node`] — One random variable with its event index and CPT
//! - [`EventSpace`] — Sorted event set with an `event -> position` index
//! - [`Assignment`] — Lookup of the event chosen for each vertex
//! - [`NetworkError`] — Typed failures for construction, parameterization and evaluation
//!
//! # Example
//!
//! ```
//! use std::collections::{BTreeMap, HashMap};
//!
//! use bayesnet_core::Network;
//! use ndarray::array;
//!
//! let ancestors = BTreeMap::from([("rain", vec![]), ("wet", vec!["rain"])]);
//! let events = BTreeMap::from([("rain", vec![false, true]), ("wet", vec![false, true])]);
//! let mut net = Network::new(["rain", "wet"], &ancestors, &events)?;
//!
//! net.set_distributions(BTreeMap::from([
//!     ("rain", array![[0.8], [0.2]]),
//!     ("wet", array![[0.9, 0.1], [0.1, 0.9]]),
//! ]))?;
//!
//! let assignment = HashMap::from([("rain", true), ("wet", true)]);
//! let p = net.probability(&assignment)?;
//! assert!((p - 0.18).abs() < 1e-12);
//! # Ok::<(), bayesnet_core::NetworkError>(())
//! ```

pub mod assignment;
pub mod config;
pub mod edges;
pub mod error;
pub mod event;
pub mod network;
pub mod node;

pub use assignment::Assignment;
pub use config::NetworkConfig;
pub use edges::invert;
pub use error::{ConstructionStep, NetworkError, NetworkResult};
pub use event::{Event, EventSpace, VertexId};
pub use network::Network;
pub use node::Node;
