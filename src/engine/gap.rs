//! Percentage-point gaps between two probabilities and their qualitative tiers.

use serde::Serialize;
use std::fmt;

use super::{round_to, EngineError};

/// Difference between two tail probabilities, in percentage points.
///
/// # Arguments
/// * `p_a` – Team A's probability, in [0, 1].
/// * `p_b` – Team B's probability, in [0, 1].
///
/// # Returns
/// `(p_a − p_b) · 100` rounded to 2 decimals; positive favours A.
pub fn percentage_point_gap(p_a: f64, p_b: f64) -> f64 {
    debug_assert!((0.0..=1.0).contains(&p_a), "p_a out of range");
    debug_assert!((0.0..=1.0).contains(&p_b), "p_b out of range");
    round_to((p_a - p_b) * 100.0, 2)
}

/// Boundaries, in pp, between the advantage tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierThresholds {
    pub moderate: f64,
    pub clear: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        TierThresholds {
            moderate: 3.0,
            clear: 7.0,
        }
    }
}

impl TierThresholds {
    pub fn new(moderate: f64, clear: f64) -> Result<Self, EngineError> {
        if !moderate.is_finite() || !clear.is_finite() || moderate < 0.0 || moderate > clear {
            return Err(EngineError::InvalidThresholds { moderate, clear });
        }
        Ok(TierThresholds { moderate, clear })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvantageTier {
    ClearA,
    ModerateA,
    Balanced,
    ModerateB,
    ClearB,
}

impl AdvantageTier {
    pub fn description(&self) -> &'static str {
        match self {
            AdvantageTier::ClearA => "clear advantage to A",
            AdvantageTier::ModerateA => "moderate advantage to A",
            AdvantageTier::Balanced => "balanced",
            AdvantageTier::ModerateB => "moderate advantage to B",
            AdvantageTier::ClearB => "clear advantage to B",
        }
    }
}

impl fmt::Display for AdvantageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Step function from a pp gap to its tier. Boundaries belong to the inner
/// tier: exactly `moderate` is balanced, exactly `clear` is moderate.
pub fn classify(gap_pp: f64, thresholds: &TierThresholds) -> AdvantageTier {
    if gap_pp > thresholds.clear {
        AdvantageTier::ClearA
    } else if gap_pp > thresholds.moderate {
        AdvantageTier::ModerateA
    } else if gap_pp >= -thresholds.moderate {
        AdvantageTier::Balanced
    } else if gap_pp >= -thresholds.clear {
        AdvantageTier::ModerateB
    } else {
        AdvantageTier::ClearB
    }
}

/// Reading of a head-to-head probability P(A > B) from A's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    RelevantAdvantage,
    SlightAdvantage,
    RelativeDisadvantage,
}

impl Verdict {
    pub fn from_probability(p: f64) -> Self {
        if p >= 0.6 {
            Verdict::RelevantAdvantage
        } else if p >= 0.5 {
            Verdict::SlightAdvantage
        } else {
            Verdict::RelativeDisadvantage
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Verdict::RelevantAdvantage => "statistically relevant advantage",
            Verdict::SlightAdvantage => "slight advantage",
            Verdict::RelativeDisadvantage => "relative disadvantage",
        }
    }
}
