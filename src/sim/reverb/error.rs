//! Reverberation error types

use thiserror::Error;

/// Result type for reverberation operations
pub type ReverbResult<T> = Result<T, ReverbError>;

/// Structural and usage errors of a reverberation computation.
///
/// Rejected collisions (bad grazing angle, unknown path) are not errors;
/// notifications report them by returning `Ok(false)`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReverbError {
    /// Collision reported on a different frequency grid than the run's grid
    #[error("Frequency grid mismatch: run uses {expected} frequencies, collision carried {actual}")]
    FrequencyMismatch { expected: usize, actual: usize },

    /// Spreading model produced the wrong number of values
    #[error("Spread has {spread} values but the frequency grid has {frequencies}")]
    SpreadShape { frequencies: usize, spread: usize },

    /// Compute requested before the propagator signaled completion
    #[error("Reverberation requested before propagation completed")]
    PropagationIncomplete,

    /// Compute requested a second time on the same collections
    #[error("Reverberation was already computed for this run")]
    AlreadyComputed,

    /// Collision delivered after the collections were frozen
    #[error("Eigenverb collections are frozen")]
    CollectionsFrozen,

    /// Invalid configuration or input grid
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
