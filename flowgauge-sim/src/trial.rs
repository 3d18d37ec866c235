//! Single-trial driver: one scenario, one bot, one tick budget.

use crate::scenario::{BotPolicy, Scenario};

/// Tick budget and sampling layout for a single trial.
#[derive(Debug, Clone, Copy)]
pub struct TrialConfig {
    pub max_ticks: u32,
    pub ticks_per_second: u32,
    pub curve_buckets: usize,
}

impl TrialConfig {
    #[must_use]
    pub const fn new(max_ticks: u32, ticks_per_second: u32, curve_buckets: usize) -> Self {
        Self {
            max_ticks,
            ticks_per_second,
            curve_buckets,
        }
    }

    /// Ticks between trajectory samples.
    #[must_use]
    pub fn sample_interval(&self) -> u32 {
        let buckets = u32::try_from(self.curve_buckets.max(1)).unwrap_or(1);
        (self.max_ticks / buckets).max(1)
    }
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            max_ticks: 3_600,
            ticks_per_second: 60,
            curve_buckets: 20,
        }
    }
}

/// Outcome of one completed trial. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SimRun {
    pub ticks: u32,
    pub seconds: f64,
    pub score: f64,
    /// Final level, only for scenarios that track one.
    pub level: Option<f64>,
    /// Whether the trial hit the tick budget instead of dying.
    pub timed_out: bool,
    /// Score sampled at fixed intervals, always `curve_buckets` long.
    pub trajectory: Vec<f64>,
}

/// Drive one scenario through repeated ticks until death or the tick
/// budget runs out.
///
/// The score is sampled into a fixed-length trajectory at even tick
/// intervals; early deaths pad the remainder with the final score so
/// every run yields the same shape. Panics raised by the scenario or the
/// bot propagate to the caller and abort the batch: a broken simulation
/// is a bug, not a transient fault, and is never retried.
pub fn run_trial<S, P>(scenario: &mut S, bot: &mut P, cfg: &TrialConfig) -> SimRun
where
    S: Scenario,
    P: BotPolicy<S> + ?Sized,
{
    scenario.reset();
    bot.reset_episode();

    let sample_interval = cfg.sample_interval();
    let mut trajectory = Vec::with_capacity(cfg.curve_buckets);
    let mut ticks = 0_u32;

    while scenario.is_running() && ticks < cfg.max_ticks {
        if ticks % sample_interval == 0 && trajectory.len() < cfg.curve_buckets {
            trajectory.push(scenario.score());
        }
        let input = bot.decide(scenario);
        scenario.step(input);
        ticks += 1;
    }

    let final_score = scenario.score();
    while trajectory.len() < cfg.curve_buckets {
        trajectory.push(final_score);
    }

    SimRun {
        ticks,
        seconds: f64::from(ticks) / f64::from(cfg.ticks_per_second.max(1)),
        score: final_score,
        level: scenario.level(),
        timed_out: ticks >= cfg.max_ticks,
        trajectory,
    }
}
