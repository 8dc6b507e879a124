use thiserror::Error;

/// Input-validation failures raised by the probability engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid rate {0}: a Poisson mean must be finite and non-negative")]
    InvalidRate(f64),

    #[error("invalid truncation tolerance {0}: must be finite and in [1e-15, 1)")]
    InvalidTolerance(f64),

    #[error(
        "invalid tier thresholds (moderate {moderate}, clear {clear}): need 0 <= moderate <= clear"
    )]
    InvalidThresholds { moderate: f64, clear: f64 },

    #[error("truncation bound {required} for mean {mu} exceeds the cap of {cap}")]
    TruncationTooLarge { mu: f64, required: u32, cap: u32 },
}
