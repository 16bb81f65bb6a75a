use bayesnet_core::NetworkError;
use thiserror::Error;

/// Errors produced while generating fixtures.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Generator parameters that cannot produce a network, or would produce
    /// one too large to allocate.
    #[error("invalid generator config: {0}")]
    InvalidConfig(String),

    /// The generated inputs were rejected while building the network.
    #[error("network error: {0}")]
    Network(#[from] NetworkError),
}

/// Convenience alias for fixture results.
pub type FixtureResult<T> = Result<T, FixtureError>;
