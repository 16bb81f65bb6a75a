use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, NetworkResult};

/// Configuration for a [`Network`](crate::Network).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Largest accepted deviation of a CPT column sum from 1.
    pub normalization_tolerance: f64,
    /// When `true`, CPTs whose columns do not sum to 1 are rejected at
    /// assignment time instead of only by
    /// [`Network::validate_distributions`](crate::Network::validate_distributions).
    pub require_normalized: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            normalization_tolerance: 1e-9,
            require_normalized: false,
        }
    }
}

impl NetworkConfig {
    /// A configuration that rejects non-normalized CPTs on assignment.
    pub fn strict() -> Self {
        Self {
            require_normalized: true,
            ..Default::default()
        }
    }

    /// Reject a tolerance that is NaN, infinite or negative.
    pub fn validate(&self) -> NetworkResult<()> {
        let tolerance = self.normalization_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(NetworkError::InvalidInput(format!(
                "normalization_tolerance must be a finite non-negative number, got {tolerance}"
            )));
        }
        Ok(())
    }
}
