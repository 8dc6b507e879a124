//! Match report: every number the presentation layer shows for a matchup.
//!
//! The report is computed in full on every run; which parts get rendered is
//! decided later by [`render::ViewOptions`].

pub mod interpret;
pub mod render;

pub use interpret::Interpretation;
pub use render::{export, render, ViewOptions};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::engine::{
    build_table, classify, compare_with, percentage_point_gap, tail_probability, AdvantageTier,
    Comparison, EngineError, TableRow, TierThresholds, TruncationPolicy, Verdict,
};
use crate::matchup::{Event, Matchup, Team};

/// Model parameters shared by every event in a report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportSettings {
    pub tail_threshold: u32,
    pub table_k_max: u32,
    pub thresholds: TierThresholds,
    pub truncation: TruncationPolicy,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            tail_threshold: 5,
            table_k_max: 10,
            thresholds: TierThresholds::default(),
            truncation: TruncationPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamInfo {
    pub name: String,
    pub matches: u32,
}

impl From<&Team> for TeamInfo {
    fn from(team: &Team) -> Self {
        TeamInfo {
            name: team.name.clone(),
            matches: team.matches,
        }
    }
}

/// One team's view of one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideSummary {
    pub rate: f64,
    pub table: Vec<TableRow>,
    /// P(X >= tail_threshold)
    pub tail: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpecialOutcome {
    #[serde(flatten)]
    pub comparison: Comparison,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventReport {
    pub event: Event,
    pub a: SideSummary,
    pub b: SideSummary,
    /// Tail gap A − B in percentage points.
    pub gap_pp: f64,
    pub tier: AdvantageTier,
    pub special: SpecialOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub generated_at: DateTime<Utc>,
    pub team_a: TeamInfo,
    pub team_b: TeamInfo,
    pub tail_threshold: u32,
    pub table_k_max: u32,
    pub thresholds: TierThresholds,
    pub events: Vec<EventReport>,
    pub interpretation: Interpretation,
}

pub fn build_report(
    matchup: &Matchup,
    settings: &ReportSettings,
) -> Result<MatchReport, EngineError> {
    build_report_at(matchup, settings, Utc::now())
}

pub fn build_report_at(
    matchup: &Matchup,
    settings: &ReportSettings,
    generated_at: DateTime<Utc>,
) -> Result<MatchReport, EngineError> {
    let events = Event::ALL
        .iter()
        .map(|&event| event_report(matchup, event, settings))
        .collect::<Result<Vec<_>, _>>()?;

    let team_a = TeamInfo::from(&matchup.team_a);
    let team_b = TeamInfo::from(&matchup.team_b);
    let interpretation = interpret::interpret(
        &events,
        &team_a.name,
        &team_b.name,
        &settings.thresholds,
        settings.tail_threshold,
        settings.table_k_max,
    );

    Ok(MatchReport {
        generated_at,
        team_a,
        team_b,
        tail_threshold: settings.tail_threshold,
        table_k_max: settings.table_k_max,
        thresholds: settings.thresholds,
        events,
        interpretation,
    })
}

fn side_summary(
    team: &Team,
    event: Event,
    settings: &ReportSettings,
) -> Result<SideSummary, EngineError> {
    let rate = team.rate(event);
    Ok(SideSummary {
        rate,
        table: build_table(rate, settings.table_k_max)?,
        tail: tail_probability(rate, settings.tail_threshold)?,
    })
}

fn event_report(
    matchup: &Matchup,
    event: Event,
    settings: &ReportSettings,
) -> Result<EventReport, EngineError> {
    let a = side_summary(&matchup.team_a, event, settings)?;
    let b = side_summary(&matchup.team_b, event, settings)?;
    let gap_pp = percentage_point_gap(a.tail, b.tail);
    let tier = classify(gap_pp, &settings.thresholds);
    let comparison = compare_with(a.rate, b.rate, settings.truncation)?;
    debug!(
        event = event.label(),
        gap_pp,
        a_greater = comparison.a_greater,
        covered = comparison.total(),
        k_max = comparison.k_max,
        "event evaluated"
    );
    Ok(EventReport {
        event,
        a,
        b,
        gap_pp,
        tier,
        special: SpecialOutcome {
            comparison,
            verdict: comparison.verdict(),
        },
    })
}
