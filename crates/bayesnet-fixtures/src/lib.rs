//! Seeded random Bayesian networks.
//!
//! Produces the inputs a caller hands to [`bayesnet_core::Network`]: a
//! vertex list, an acyclic ancestor map, an event map and normalized CPTs.
//! The same [`GeneratorConfig`] always yields the same network.

pub mod config;
pub mod error;
pub mod generator;

pub use config::GeneratorConfig;
pub use error::{FixtureError, FixtureResult};
pub use generator::{
    all_assignments, generate, generate_fixture, random_cpt, vertex_name, AssignmentSampler,
    NetworkFixture, RandomNetwork, VertexName,
};
