//! Poisson mass and cumulative distribution over small event counts.
//!
//! Masses are produced by the log-space recurrence
//!   ln P(X=k) = ln P(X=k-1) + ln(mu) - ln(k)
//! starting from ln P(X=0) = -mu, so no factorial is ever materialised and
//! large k cannot overflow.

use serde::Serialize;

use super::{round_to, EngineError};

/// Number of decimals kept in the percentage columns of a table.
const TABLE_DECIMALS: i32 = 4;

/// Below this, `exp` underflows to zero in f64.
const LN_UNDERFLOW: f64 = -745.0;

/// A validated Poisson distribution with mean `mu`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Poisson {
    mu: f64,
}

impl Poisson {
    /// Rejects negative and non-finite means; never clamps.
    pub fn new(mu: f64) -> Result<Self, EngineError> {
        if !mu.is_finite() || mu < 0.0 {
            return Err(EngineError::InvalidRate(mu));
        }
        Ok(Poisson { mu })
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// P(X = k) for every k in `0..=k_max`.
    pub fn masses(&self, k_max: u32) -> Vec<f64> {
        let ln_mu = self.mu.ln(); // -inf when mu == 0, which zeroes every k > 0
        let mut ln_p = -self.mu;
        let mut out = Vec::with_capacity(k_max as usize + 1);
        out.push(ln_p.exp());
        for k in 1..=k_max {
            ln_p += ln_mu - (k as f64).ln();
            out.push(ln_p.exp());
        }
        out
    }

    /// P(X <= k) for every k in `0..=k_max`.
    pub fn cumulative(&self, k_max: u32) -> Vec<f64> {
        let mut acc = 0.0;
        self.masses(k_max)
            .into_iter()
            .map(|p| {
                acc += p;
                acc.min(1.0)
            })
            .collect()
    }

    /// P(X <= k), summed term by term. Stops once the masses past the mode
    /// have underflowed, so a huge `k` costs no more than the mass it carries.
    pub fn cdf(&self, k: u32) -> f64 {
        let ln_mu = self.mu.ln();
        let mut ln_p = -self.mu;
        let mut acc = ln_p.exp();
        for i in 1..=k {
            ln_p += ln_mu - (i as f64).ln();
            if i as f64 > self.mu && ln_p < LN_UNDERFLOW {
                break;
            }
            acc += ln_p.exp();
        }
        acc.min(1.0)
    }

    /// P(X >= k) = 1 - P(X <= k-1).
    pub fn tail(&self, k: u32) -> f64 {
        if k == 0 {
            return 1.0;
        }
        (1.0 - self.cdf(k - 1)).clamp(0.0, 1.0)
    }
}

/// One row of a 0..K probability table, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TableRow {
    pub k: u32,
    pub pmf_pct: f64,
    pub cdf_pct: f64,
}

/// Build the 0..K probability table for one team and one event.
///
/// # Arguments
/// * `mu`    – Mean count per match (finite, ≥ 0).
/// * `k_max` – Largest count shown; the table has `k_max + 1` rows.
///
/// # Returns
/// One [`TableRow`] per k with P(X = k) and P(X ≤ k) as percentages rounded
/// to four decimals. The cumulative column at `k_max` may fall short of
/// 100 %: mass beyond the bound is simply not shown. Fails with
/// [`EngineError::InvalidRate`] for a negative or non-finite `mu`.
pub fn build_table(mu: f64, k_max: u32) -> Result<Vec<TableRow>, EngineError> {
    let dist = Poisson::new(mu)?;
    let rows = dist
        .masses(k_max)
        .into_iter()
        .zip(dist.cumulative(k_max))
        .zip(0u32..)
        .map(|((pmf, cdf), k)| TableRow {
            k,
            pmf_pct: round_to(pmf * 100.0, TABLE_DECIMALS),
            cdf_pct: round_to(cdf * 100.0, TABLE_DECIMALS),
        })
        .collect();
    Ok(rows)
}

/// Probability that an event happens at least `k` times in a match.
///
/// P(X ≥ k) = 1 − P(X ≤ k−1)
///
/// # Arguments
/// * `mu` – Mean count per match (finite, ≥ 0).
/// * `k`  – Threshold; `k = 0` always yields 1.0.
///
/// # Returns
/// A probability in [0, 1], or [`EngineError::InvalidRate`] for a negative or
/// non-finite `mu`.
pub fn tail_probability(mu: f64, k: u32) -> Result<f64, EngineError> {
    Ok(Poisson::new(mu)?.tail(k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use statrs::distribution::{Discrete, DiscreteCDF, Poisson as Reference};

    #[test]
    fn rejects_negative_and_non_finite_rates() {
        assert_eq!(Poisson::new(-0.1), Err(EngineError::InvalidRate(-0.1)));
        assert!(Poisson::new(f64::NAN).is_err());
        assert!(Poisson::new(f64::INFINITY).is_err());
        assert!(build_table(-1.0, 10).is_err());
        assert!(tail_probability(-1.0, 5).is_err());
    }

    #[test]
    fn zero_rate_puts_all_mass_at_zero() {
        let table = build_table(0.0, 10).unwrap();
        assert_eq!(table.len(), 11);
        assert_relative_eq!(table[0].pmf_pct, 100.0);
        assert_relative_eq!(table[0].cdf_pct, 100.0);
        for row in &table[1..] {
            assert_eq!(row.pmf_pct, 0.0);
            assert_relative_eq!(row.cdf_pct, 100.0);
        }
        assert_eq!(tail_probability(0.0, 1).unwrap(), 0.0);
    }

    #[test]
    fn zero_mass_is_exp_of_minus_mu() {
        for mu in [0.0, 0.4, 1.8, 6.5, 22.0] {
            let d = Poisson::new(mu).unwrap();
            assert_relative_eq!(d.masses(0)[0], (-mu).exp(), epsilon = 1e-15);
        }
    }

    #[test]
    fn matches_reference_distribution() {
        for mu in [0.3, 1.8, 5.2, 11.0, 48.0] {
            let d = Poisson::new(mu).unwrap();
            let reference = Reference::new(mu).unwrap();
            let masses = d.masses(60);
            let cumulative = d.cumulative(60);
            for k in 0..=60u32 {
                assert_relative_eq!(masses[k as usize], reference.pmf(k as u64), epsilon = 1e-12);
                let expected = reference.cdf(k as u64);
                assert_relative_eq!(cumulative[k as usize], expected, epsilon = 1e-10);
                assert_relative_eq!(d.cdf(k), expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn large_counts_do_not_overflow() {
        let d = Poisson::new(3.0).unwrap();
        let masses = d.masses(400);
        assert!(masses.iter().all(|p| p.is_finite() && *p >= 0.0));
        assert!(masses[400] < 1e-300);
    }

    #[test]
    fn huge_threshold_tail_is_zero() {
        assert!(tail_probability(2.0, 100_000_000).unwrap() < 1e-15);
        assert_eq!(tail_probability(0.0, u32::MAX).unwrap(), 0.0);
        assert_relative_eq!(Poisson::new(2.0).unwrap().cdf(u32::MAX), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn cdf_matches_cumulative_column() {
        for mu in [0.0, 1.8, 9.6, 120.0] {
            let d = Poisson::new(mu).unwrap();
            let cumulative = d.cumulative(300);
            for k in [0u32, 3, 10, 150, 300] {
                assert_relative_eq!(d.cdf(k), cumulative[k as usize], epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn cumulative_column_is_non_decreasing() {
        for mu in [0.0, 0.9, 4.7, 12.3] {
            let table = build_table(mu, 10).unwrap();
            for pair in table.windows(2) {
                assert!(pair[1].cdf_pct >= pair[0].cdf_pct);
            }
            assert!(table[10].cdf_pct <= 100.0);
        }
    }

    #[test]
    fn truncated_mass_at_ten_is_nearly_complete_for_small_rates() {
        for mu in [0.1, 1.0, 2.0, 3.0] {
            let total: f64 = Poisson::new(mu).unwrap().masses(10).iter().sum();
            assert!(total > 0.999, "mu={mu} total={total}");
        }
        // A high rate leaves visible residual mass beyond k = 10.
        let total: f64 = Poisson::new(12.0).unwrap().masses(10).iter().sum();
        assert!(total < 0.4);
    }

    #[test]
    fn tail_at_zero_is_certain() {
        for mu in [0.0, 0.5, 3.3, 40.0] {
            assert_eq!(tail_probability(mu, 0).unwrap(), 1.0);
        }
    }

    #[test]
    fn tail_agrees_with_table_cumulative_column() {
        for mu in [0.7, 1.8, 4.1, 9.6] {
            let table = build_table(mu, 10).unwrap();
            let tail = tail_probability(mu, 5).unwrap();
            assert_relative_eq!(tail * 100.0, 100.0 - table[4].cdf_pct, epsilon = 1e-3);
            assert_relative_eq!(tail, 1.0 - Poisson::new(mu).unwrap().cdf(4), epsilon = 1e-15);
        }
    }

    #[test]
    fn goal_like_rate_scenario() {
        let table = build_table(1.8, 10).unwrap();
        assert_relative_eq!(round_to(table[0].pmf_pct, 2), 16.53);
        assert_relative_eq!(round_to(table[4].cdf_pct, 2), 96.36);
        let tail = tail_probability(1.8, 5).unwrap();
        assert_relative_eq!(round_to(tail * 100.0, 2), 3.64);
    }

    #[test]
    fn table_rounds_to_four_decimals() {
        let table = build_table(1.8, 3).unwrap();
        assert_eq!(table.len(), 4);
        assert_relative_eq!(table[1].pmf_pct, 29.7538);
        assert_relative_eq!(table[2].cdf_pct, 73.0621);
    }
}
