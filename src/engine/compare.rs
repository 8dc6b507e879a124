//! Head-to-head comparison of two independent Poisson counts.
//!
//! P(A > B) = Σ_{i=0}^{k_max} P(A = i) · P(B ≤ i − 1)
//!
//! The series is truncated at `k_max`; whatever mass A carries beyond the
//! bound is dropped, so results are biased low when the bound is small
//! relative to the means.

use serde::Serialize;
use tracing::{debug, warn};

use super::gap::Verdict;
use super::{EngineError, Poisson};

/// Default bound on the tail mass dropped by adaptive truncation.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;
/// Adaptive truncation never goes below this bound.
pub const MIN_K_MAX: u32 = 10;
/// No comparison sums beyond this bound, adaptive or fixed.
pub const MAX_K_MAX: u32 = 1000;
/// Summation error of the cumulative mass sits around here; tighter tails
/// cannot be resolved.
pub const MIN_TOLERANCE: f64 = 1e-15;

/// How the summation bound for a comparison is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TruncationPolicy {
    /// Always sum to the same bound.
    Fixed(u32),
    /// Grow the bound with the larger mean until the dropped tail is below
    /// `tolerance`.
    Adaptive { tolerance: f64 },
}

impl Default for TruncationPolicy {
    fn default() -> Self {
        TruncationPolicy::Adaptive {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl TruncationPolicy {
    /// The summation bound to use for the pair of means.
    pub fn resolve(&self, mu_a: f64, mu_b: f64) -> Result<u32, EngineError> {
        match *self {
            TruncationPolicy::Fixed(k_max) => Ok(k_max),
            TruncationPolicy::Adaptive { tolerance } => required_k_max(mu_a, mu_b, tolerance),
        }
    }
}

/// Outcome probabilities of a head-to-head over one truncated support.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    pub k_max: u32,
    /// P(A > B)
    pub a_greater: f64,
    /// P(A = B)
    pub tie: f64,
    /// P(B > A)
    pub b_greater: f64,
}

impl Comparison {
    pub fn total(&self) -> f64 {
        self.a_greater + self.tie + self.b_greater
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_probability(self.a_greater)
    }
}

/// `mu + 6·sqrt(mu)`: below this a truncation bound visibly cuts into the mass.
pub fn sanity_bound(mu: f64) -> f64 {
    mu + 6.0 * mu.sqrt()
}

/// Smallest bound, at least [`sanity_bound`] of the larger mean, for which the
/// larger mean's mass beyond the bound is below `tolerance`.
///
/// `tolerance` must lie in `[MIN_TOLERANCE, 1)`.
pub fn required_k_max(mu_a: f64, mu_b: f64, tolerance: f64) -> Result<u32, EngineError> {
    let a = Poisson::new(mu_a)?;
    let b = Poisson::new(mu_b)?;
    if !tolerance.is_finite() || tolerance < MIN_TOLERANCE || tolerance >= 1.0 {
        return Err(EngineError::InvalidTolerance(tolerance));
    }

    let dominant = if a.mu() >= b.mu() { a } else { b };
    let floor = (sanity_bound(dominant.mu()).ceil() as u32).max(MIN_K_MAX);
    if floor > MAX_K_MAX {
        return Err(EngineError::TruncationTooLarge {
            mu: dominant.mu(),
            required: floor,
            cap: MAX_K_MAX,
        });
    }

    let cumulative = dominant.cumulative(MAX_K_MAX);
    let k_max = (floor..=MAX_K_MAX)
        .find(|&k| 1.0 - cumulative[k as usize] < tolerance)
        .ok_or(EngineError::TruncationTooLarge {
            mu: dominant.mu(),
            required: MAX_K_MAX + 1,
            cap: MAX_K_MAX,
        })?;

    debug!(mu_a, mu_b, tolerance, k_max, "resolved adaptive truncation bound");
    Ok(k_max)
}

/// Probability that team A records strictly more events than team B.
///
/// P(A > B) = Σ_{i=0}^{k_max} P(A = i) · P(B ≤ i − 1)
///
/// # Arguments
/// * `mu_a`  – Team A's mean count per match (finite, ≥ 0).
/// * `mu_b`  – Team B's mean count per match (finite, ≥ 0).
/// * `k_max` – Summation bound, at most [`MAX_K_MAX`]. A bound below
///   `mu + 6·sqrt(mu)` for either side logs a warning and biases the result low.
///
/// # Returns
/// A probability in [0, 1], [`EngineError::InvalidRate`] for a bad mean, or
/// [`EngineError::TruncationTooLarge`] when `k_max` exceeds the cap.
pub fn greater_than_probability(mu_a: f64, mu_b: f64, k_max: u32) -> Result<f64, EngineError> {
    let a = Poisson::new(mu_a)?;
    let b = Poisson::new(mu_b)?;
    check_bound(&a, &b, k_max)?;
    warn_if_truncation_short(&a, &b, k_max);
    Ok(sum_greater(&a.masses(k_max), &b.cumulative(k_max)))
}

/// P(A > B), P(A = B) and P(B > A) over the same support `0..=k_max`.
pub fn compare(mu_a: f64, mu_b: f64, k_max: u32) -> Result<Comparison, EngineError> {
    let a_greater = greater_than_probability(mu_a, mu_b, k_max)?;

    let a = Poisson::new(mu_a)?;
    let b = Poisson::new(mu_b)?;
    let (pa, ca) = (a.masses(k_max), a.cumulative(k_max));
    let pb = b.masses(k_max);
    let tie = pa.iter().zip(&pb).map(|(x, y)| x * y).sum::<f64>();

    Ok(Comparison {
        k_max,
        a_greater,
        tie: tie.clamp(0.0, 1.0),
        b_greater: sum_greater(&pb, &ca),
    })
}

/// [`compare`] with the bound chosen by `policy`.
pub fn compare_with(
    mu_a: f64,
    mu_b: f64,
    policy: TruncationPolicy,
) -> Result<Comparison, EngineError> {
    let k_max = policy.resolve(mu_a, mu_b)?;
    compare(mu_a, mu_b, k_max)
}

// Σ_{i≥1} masses[i] · cumulative[i-1]
fn sum_greater(masses: &[f64], other_cumulative: &[f64]) -> f64 {
    masses
        .iter()
        .skip(1)
        .zip(other_cumulative)
        .map(|(p, c)| p * c)
        .sum::<f64>()
        .clamp(0.0, 1.0)
}

fn check_bound(a: &Poisson, b: &Poisson, k_max: u32) -> Result<(), EngineError> {
    if k_max > MAX_K_MAX {
        return Err(EngineError::TruncationTooLarge {
            mu: a.mu().max(b.mu()),
            required: k_max,
            cap: MAX_K_MAX,
        });
    }
    Ok(())
}

fn warn_if_truncation_short(a: &Poisson, b: &Poisson, k_max: u32) {
    let needed = sanity_bound(a.mu()).max(sanity_bound(b.mu()));
    if (k_max as f64) < needed {
        warn!(
            mu_a = a.mu(),
            mu_b = b.mu(),
            k_max,
            "truncation bound below mu + 6*sqrt(mu) ({:.1}); comparison is biased low",
            needed
        );
    }
}
