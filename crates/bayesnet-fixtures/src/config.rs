use serde::{Deserialize, Serialize};

use crate::error::{FixtureError, FixtureResult};

/// Parameters of a randomly generated network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of vertices.
    pub vertices: usize,
    /// Upper bound on the ancestors drawn for each vertex.
    pub max_ancestors: usize,
    /// Smallest event set size.
    pub min_events: usize,
    /// Largest event set size.
    pub max_events: usize,
    /// Seed for the random number generator.
    pub seed: u64,
    /// Upper bound on the number of cells in any single generated CPT.
    pub max_cells: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            vertices: 6,
            max_ancestors: 2,
            min_events: 2,
            max_events: 3,
            seed: 0,
            max_cells: 1 << 20,
        }
    }
}

impl GeneratorConfig {
    /// Default parameters with the given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Reject parameters that cannot produce a valid network.
    pub fn validate(&self) -> FixtureResult<()> {
        if self.vertices == 0 {
            return Err(FixtureError::InvalidConfig("vertices must be positive".into()));
        }
        if self.min_events == 0 {
            return Err(FixtureError::InvalidConfig("min_events must be positive".into()));
        }
        if self.min_events > self.max_events {
            return Err(FixtureError::InvalidConfig(format!(
                "min_events ({}) exceeds max_events ({})",
                self.min_events, self.max_events
            )));
        }
        if u32::try_from(self.max_events).is_err() {
            return Err(FixtureError::InvalidConfig(format!(
                "max_events ({}) exceeds {}",
                self.max_events,
                u32::MAX
            )));
        }
        if self.max_cells == 0 {
            return Err(FixtureError::InvalidConfig("max_cells must be positive".into()));
        }
        Ok(())
    }
}
