pub mod compare;
pub mod error;
pub mod gap;
pub mod poisson;

pub use compare::{compare_with, Comparison, TruncationPolicy};
pub use error::EngineError;
pub use gap::{classify, percentage_point_gap, AdvantageTier, TierThresholds, Verdict};
pub use poisson::{build_table, tail_probability, Poisson, TableRow};

/// Round `value` to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
