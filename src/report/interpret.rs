//! Automatic reading of the tail gaps: a technical summary, a tactical
//! reading, one narrative line per event and a few market suggestions.

use serde::Serialize;

use super::EventReport;
use crate::engine::{AdvantageTier, TierThresholds};
use crate::matchup::Event;

/// Gap in pp beyond which a market suggestion is emitted.
const ADVICE_GAP_PP: f64 = 5.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Interpretation {
    pub technical: Vec<String>,
    pub tactical: Vec<String>,
    pub executive: Vec<String>,
    pub advice: Vec<String>,
}

pub fn interpret(
    events: &[EventReport],
    team_a: &str,
    team_b: &str,
    thresholds: &TierThresholds,
    tail_threshold: u32,
    table_k_max: u32,
) -> Interpretation {
    let technical = events
        .iter()
        .map(|e| {
            format!(
                "{}: gap of {:.2} pp (P(X≥{}) A vs B).",
                e.event, e.gap_pp, tail_threshold
            )
        })
        .collect();

    let executive = events
        .iter()
        .map(|e| narrative(e.event, e.gap_pp, e.tier, team_a, team_b))
        .collect();

    Interpretation {
        technical,
        tactical: vec![tactical_reading(events, team_a, team_b, thresholds)],
        executive,
        advice: advice(events, team_a, team_b, table_k_max),
    }
}

fn narrative(event: Event, pp: f64, tier: AdvantageTier, team_a: &str, team_b: &str) -> String {
    let ev = event.label().to_lowercase();
    match tier {
        AdvantageTier::ClearA => format!(
            "{team_a} shows a clear advantage in {ev} (+{pp:.2} pp), pointing to a higher chance of high volume in this event."
        ),
        AdvantageTier::ModerateA => format!(
            "{team_a} holds a moderate advantage in {ev} (+{pp:.2} pp), a tendency towards higher volume."
        ),
        AdvantageTier::Balanced => format!(
            "{} are balanced (gap of {pp:.2} pp); the probabilities are very close.",
            event.label()
        ),
        AdvantageTier::ModerateB => {
            format!("{team_b} holds a moderate advantage in {ev} ({pp:.2} pp).")
        }
        AdvantageTier::ClearB => format!(
            "{team_b} shows a clear advantage in {ev} ({pp:.2} pp), suggesting a stronger tendency in this event."
        ),
    }
}

fn tactical_reading(
    events: &[EventReport],
    team_a: &str,
    team_b: &str,
    thresholds: &TierThresholds,
) -> String {
    let mut strongest: Option<&EventReport> = None;
    let mut weakest: Option<&EventReport> = None;
    for e in events {
        if strongest.map_or(true, |s| e.gap_pp > s.gap_pp) {
            strongest = Some(e);
        }
        if weakest.map_or(true, |w| e.gap_pp < w.gap_pp) {
            weakest = Some(e);
        }
    }

    match (strongest, weakest) {
        (Some(s), _) if s.gap_pp > thresholds.moderate => format!(
            "The standout is {}, where {team_a} is +{:.2} pp ahead of {team_b}, signalling an edge in production and volume.",
            s.event.label().to_lowercase(),
            s.gap_pp
        ),
        (_, Some(w)) if w.gap_pp < -thresholds.moderate => format!(
            "The standout is {}, where {team_b} is {:.2} pp ahead of {team_a}.",
            w.event.label().to_lowercase(),
            w.gap_pp.abs()
        ),
        _ => "No strong differences between the teams; the match should be balanced in statistical volume."
            .to_string(),
    }
}

fn advice(events: &[EventReport], team_a: &str, team_b: &str, table_k_max: u32) -> Vec<String> {
    let mut out = Vec::new();
    for e in events {
        let pp = e.gap_pp;
        match e.event {
            Event::Goals if pp > ADVICE_GAP_PP => out.push(format!(
                "Goals: consider 'both teams to score' carefully, or a result favourable to {team_a}."
            )),
            Event::Goals if pp < -ADVICE_GAP_PP => out.push(format!(
                "Goals: {team_b} has the better chance; look at markets that favour {team_b}."
            )),
            Event::Corners if pp.abs() > ADVICE_GAP_PP => out.push(
                "Corners: an 'over X corners' market is worth exploring if the side with the edge is expected to attack."
                    .to_string(),
            ),
            Event::Cards if pp < -ADVICE_GAP_PP => out.push(format!(
                "Cards: {team_b} tends to collect more cards; be careful with card markets."
            )),
            _ => {}
        }
    }
    if out.is_empty() {
        out.push(format!(
            "No strong tactical recommendation detected; use the 0→{table_k_max} tables for specific decisions."
        ));
    }
    out
}
