//! Deterministic fixtures shared by the unit tests.

use crate::scenario::{BotPolicy, Scenario};

/// Scenario that dies after a fixed number of ticks, scoring one point
/// per tick.
pub struct CountdownScenario {
    lifetime_ticks: u32,
    ticks: u32,
    score: f64,
    level_every: Option<u32>,
}

impl CountdownScenario {
    pub fn new(lifetime_ticks: u32) -> Self {
        Self {
            lifetime_ticks,
            ticks: 0,
            score: 0.0,
            level_every: None,
        }
    }

    pub fn with_level_every(mut self, ticks: u32) -> Self {
        self.level_every = Some(ticks.max(1));
        self
    }
}

impl Scenario for CountdownScenario {
    type Input = ();

    fn reset(&mut self) {
        self.ticks = 0;
        self.score = 0.0;
    }

    fn step(&mut self, _input: Option<()>) {
        self.ticks += 1;
        self.score += 1.0;
    }

    fn is_running(&self) -> bool {
        self.ticks < self.lifetime_ticks
    }

    fn score(&self) -> f64 {
        self.score
    }

    fn name(&self) -> &str {
        "countdown"
    }

    fn level(&self) -> Option<f64> {
        self.level_every.map(|n| f64::from(self.ticks / n))
    }
}

/// Bot that never presses anything.
pub struct IdleBot;

impl<S: Scenario> BotPolicy<S> for IdleBot {
    fn name(&self) -> &'static str {
        "idle"
    }

    fn decide(&mut self, _scenario: &S) -> Option<S::Input> {
        None
    }
}
