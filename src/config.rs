use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::engine::compare::{MAX_K_MAX, MIN_TOLERANCE};
use crate::engine::{TierThresholds, TruncationPolicy};

/// Output format of the rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Markdown,
    Json,
}

/// Poisson event probabilities and team comparison report
#[derive(Parser, Debug, Clone)]
#[command(name = "statball", version, about)]
pub struct Config {
    /// JSON file with both teams (overrides the per-team flags)
    #[arg(long, env = "STATBALL_INPUT")]
    pub input: Option<PathBuf>,

    /// Name of team A
    #[arg(long, default_value = "Team A")]
    pub team_a: String,

    /// Matches used to derive team A's averages
    #[arg(long, default_value = "20")]
    pub matches_a: u32,

    /// Average goals per match (team A)
    #[arg(long, default_value = "0.0")]
    pub goals_a: f64,

    /// Average cards per match (team A)
    #[arg(long, default_value = "0.0")]
    pub cards_a: f64,

    /// Average shots per match (team A)
    #[arg(long, default_value = "0.0")]
    pub shots_a: f64,

    /// Average corners per match (team A)
    #[arg(long, default_value = "0.0")]
    pub corners_a: f64,

    /// Average offsides per match (team A)
    #[arg(long, default_value = "0.0")]
    pub offsides_a: f64,

    /// Name of team B
    #[arg(long, default_value = "Team B")]
    pub team_b: String,

    /// Matches used to derive team B's averages
    #[arg(long, default_value = "20")]
    pub matches_b: u32,

    /// Average goals per match (team B)
    #[arg(long, default_value = "0.0")]
    pub goals_b: f64,

    /// Average cards per match (team B)
    #[arg(long, default_value = "0.0")]
    pub cards_b: f64,

    /// Average shots per match (team B)
    #[arg(long, default_value = "0.0")]
    pub shots_b: f64,

    /// Average corners per match (team B)
    #[arg(long, default_value = "0.0")]
    pub corners_b: f64,

    /// Average offsides per match (team B)
    #[arg(long, default_value = "0.0")]
    pub offsides_b: f64,

    /// Threshold k of the tail probability P(X >= k)
    #[arg(long, env = "STATBALL_TAIL_THRESHOLD", default_value = "5")]
    pub tail_threshold: u32,

    /// Largest count shown in the probability tables
    #[arg(long, env = "STATBALL_TABLE_K_MAX", default_value = "10")]
    pub table_k_max: u32,

    /// Fixed truncation bound for A > B comparisons (adaptive when unset)
    #[arg(long, env = "STATBALL_K_MAX")]
    pub k_max: Option<u32>,

    /// Tail mass the adaptive truncation bound may drop
    #[arg(long, env = "STATBALL_TRUNCATION_TOLERANCE", default_value = "1e-6")]
    pub truncation_tolerance: f64,

    /// Gap in pp above which an advantage is "clear"
    #[arg(long, env = "STATBALL_CLEAR_GAP", default_value = "7.0")]
    pub clear_gap: f64,

    /// Gap in pp above which an advantage is "moderate"
    #[arg(long, env = "STATBALL_MODERATE_GAP", default_value = "3.0")]
    pub moderate_gap: f64,

    /// Include the P(X >= k) bar charts
    #[arg(long, env = "STATBALL_CHARTS", default_value = "false")]
    pub charts: bool,

    /// Include the special events section (A > B head-to-heads)
    #[arg(long, env = "STATBALL_SPECIALS", default_value = "false")]
    pub specials: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,

    /// Write the report to this file instead of stdout
    #[arg(long, env = "STATBALL_EXPORT")]
    pub export: Option<PathBuf>,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.table_k_max > 200 {
            anyhow::bail!("table_k_max must be at most 200");
        }
        if self.tail_threshold > MAX_K_MAX {
            anyhow::bail!("tail_threshold must be at most {MAX_K_MAX}");
        }
        if !(self.truncation_tolerance >= MIN_TOLERANCE && self.truncation_tolerance < 1.0) {
            anyhow::bail!("truncation_tolerance must be in [{MIN_TOLERANCE:e}, 1.0)");
        }
        if let Some(k_max) = self.k_max {
            if k_max == 0 || k_max > MAX_K_MAX {
                anyhow::bail!("k_max must be between 1 and {MAX_K_MAX}");
            }
        }
        self.tier_thresholds()?;
        Ok(())
    }

    pub fn tier_thresholds(&self) -> anyhow::Result<TierThresholds> {
        Ok(TierThresholds::new(self.moderate_gap, self.clear_gap)?)
    }

    pub fn truncation_policy(&self) -> TruncationPolicy {
        match self.k_max {
            Some(k_max) => TruncationPolicy::Fixed(k_max),
            None => TruncationPolicy::Adaptive {
                tolerance: self.truncation_tolerance,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["statball"];
        argv.extend_from_slice(args);
        Config::parse_from(argv)
    }

    #[test]
    fn defaults_validate() {
        let config = parse(&[]);
        config.validate().unwrap();
        assert_eq!(config.tail_threshold, 5);
        assert_eq!(config.table_k_max, 10);
        assert_eq!(config.format, ReportFormat::Text);
        assert_eq!(config.tier_thresholds().unwrap(), TierThresholds::default());
    }

    #[test]
    fn inverted_tier_thresholds_are_rejected() {
        let config = parse(&["--moderate-gap", "8", "--clear-gap", "4"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_tolerance_is_rejected() {
        assert!(parse(&["--truncation-tolerance", "0"]).validate().is_err());
        assert!(parse(&["--truncation-tolerance", "1.5"]).validate().is_err());
        assert!(parse(&["--truncation-tolerance", "1e-16"]).validate().is_err());
        parse(&["--truncation-tolerance", "1e-15"]).validate().unwrap();
    }

    #[test]
    fn count_bounds_are_capped() {
        assert!(parse(&["--tail-threshold", "1001"]).validate().is_err());
        assert!(parse(&["--k-max", "1001"]).validate().is_err());
        assert!(parse(&["--k-max", "4000000000"]).validate().is_err());
        parse(&["--tail-threshold", "1000", "--k-max", "1000"]).validate().unwrap();
    }

    #[test]
    fn fixed_k_max_selects_fixed_policy() {
        let config = parse(&["--k-max", "40"]);
        assert_eq!(config.truncation_policy(), TruncationPolicy::Fixed(40));
        assert!(matches!(
            parse(&[]).truncation_policy(),
            TruncationPolicy::Adaptive { .. }
        ));
        assert!(parse(&["--k-max", "0"]).validate().is_err());
    }

    #[test]
    fn per_team_rates_parse() {
        let config = parse(&["--team-a", "Lions", "--goals-a", "1.8", "--format", "markdown"]);
        assert_eq!(config.team_a, "Lions");
        assert_eq!(config.goals_a, 1.8);
        assert_eq!(config.format, ReportFormat::Markdown);
    }
}
