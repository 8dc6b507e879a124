pub mod models;

pub use models::{Event, Matchup, Team};

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::config::Config;
use crate::engine::Poisson;

/// Load a matchup from a JSON file shaped like [`Matchup`].
pub fn load_from_file(path: &Path) -> Result<Matchup> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read matchup file {}", path.display()))?;
    let matchup: Matchup = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse matchup file {}", path.display()))?;
    debug!("Loaded matchup from {}", path.display());
    Ok(matchup)
}

/// Build the matchup from the per-team CLI flags.
pub fn from_config(config: &Config) -> Matchup {
    let team_a = Team::new(config.team_a.clone(), config.matches_a)
        .with_rate(Event::Shots, config.shots_a)
        .with_rate(Event::Cards, config.cards_a)
        .with_rate(Event::Goals, config.goals_a)
        .with_rate(Event::Corners, config.corners_a)
        .with_rate(Event::Offsides, config.offsides_a);
    let team_b = Team::new(config.team_b.clone(), config.matches_b)
        .with_rate(Event::Shots, config.shots_b)
        .with_rate(Event::Cards, config.cards_b)
        .with_rate(Event::Goals, config.goals_b)
        .with_rate(Event::Corners, config.corners_b)
        .with_rate(Event::Offsides, config.offsides_b);
    Matchup { team_a, team_b }
}

/// Resolve the matchup: the input file wins over the CLI flags.
pub fn resolve(config: &Config) -> Result<Matchup> {
    let matchup = match &config.input {
        Some(path) => load_from_file(path)?,
        None => from_config(config),
    };
    validate(&matchup)?;
    info!(
        "Matchup: {} ({} matches) vs {} ({} matches)",
        matchup.team_a.name, matchup.team_a.matches, matchup.team_b.name, matchup.team_b.matches
    );
    Ok(matchup)
}

/// Every recorded rate must be a valid Poisson mean.
pub fn validate(matchup: &Matchup) -> Result<()> {
    for team in [&matchup.team_a, &matchup.team_b] {
        if team.name.trim().is_empty() {
            anyhow::bail!("team name must not be empty");
        }
        for (event, mu) in &team.rates {
            Poisson::new(*mu).with_context(|| format!("{} average for {}", event, team.name))?;
        }
    }
    Ok(())
}
