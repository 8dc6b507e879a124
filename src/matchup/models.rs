use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Count-based match event modelled with a per-match Poisson rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Event {
    Shots,
    Cards,
    Goals,
    Corners,
    Offsides,
}

impl Event {
    /// Display order used by every table and chart.
    pub const ALL: [Event; 5] = [
        Event::Shots,
        Event::Cards,
        Event::Goals,
        Event::Corners,
        Event::Offsides,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Event::Shots => "Shots",
            Event::Cards => "Cards",
            Event::Goals => "Goals",
            Event::Corners => "Corners",
            Event::Offsides => "Offsides",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A team and its historical per-match averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    /// Number of matches the averages were taken over.
    #[serde(default)]
    pub matches: u32,
    #[serde(default)]
    pub rates: BTreeMap<Event, f64>,
}

impl Team {
    pub fn new(name: impl Into<String>, matches: u32) -> Self {
        Team {
            name: name.into(),
            matches,
            rates: BTreeMap::new(),
        }
    }

    pub fn with_rate(mut self, event: Event, mu: f64) -> Self {
        self.rates.insert(event, mu);
        self
    }

    /// Mean count per match; an event with no recorded average is 0.
    pub fn rate(&self, event: Event) -> f64 {
        self.rates.get(&event).copied().unwrap_or(0.0)
    }
}

/// Two teams compared side by side; A is always the reference side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub team_a: Team,
    pub team_b: Team,
}
