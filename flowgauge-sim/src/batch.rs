//! Batch orchestration: run many trials under one configuration and
//! collect the raw outcome vectors.

use crate::scenario::{BotPolicy, Scenario};
use crate::trial::{SimRun, TrialConfig, run_trial};

/// Configuration for one batch of trials.
#[derive(Debug, Clone, Copy)]
pub struct BatchConfig {
    pub runs: usize,
    pub ticks_per_second: u32,
    pub max_seconds: f64,
    pub curve_buckets: usize,
    /// Fire the progress callback every this many trials (always on the
    /// last one).
    pub progress_every: usize,
    pub seed: u64,
}

impl BatchConfig {
    #[must_use]
    pub fn new(runs: usize) -> Self {
        Self {
            runs,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub const fn with_max_seconds(mut self, max_seconds: f64) -> Self {
        self.max_seconds = max_seconds;
        self
    }

    #[must_use]
    pub const fn with_ticks_per_second(mut self, ticks_per_second: u32) -> Self {
        self.ticks_per_second = ticks_per_second;
        self
    }

    #[must_use]
    pub const fn with_progress_every(mut self, progress_every: usize) -> Self {
        self.progress_every = progress_every;
        self
    }

    /// Tick budget implied by the time budget and tick rate.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn max_ticks(&self) -> u32 {
        let ticks = self.max_seconds * f64::from(self.ticks_per_second);
        if ticks <= 0.0 { 0 } else { ticks as u32 }
    }

    #[must_use]
    pub fn trial_config(&self) -> TrialConfig {
        TrialConfig::new(self.max_ticks(), self.ticks_per_second, self.curve_buckets)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            runs: 100,
            ticks_per_second: 60,
            max_seconds: 60.0,
            curve_buckets: 20,
            progress_every: 1,
            seed: 1337,
        }
    }
}

/// Snapshot handed to progress callbacks after a trial completes.
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress {
    pub run: usize,
    pub total: usize,
    /// Survival seconds of the trial that just finished.
    pub elapsed_secs: f64,
    pub score: f64,
}

/// Callback invoked as trials complete.
pub type ProgressFn<'a> = dyn FnMut(BatchProgress) + 'a;

/// Raw outcome vectors for one batch. Owned by the orchestrator while
/// running, then handed to the analyzer read-only.
///
/// The level vector only holds entries from trials whose scenario tracks
/// a level, so it may be shorter than `runs`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub runs: usize,
    pub survival_secs: Vec<f64>,
    pub scores: Vec<f64>,
    pub levels: Vec<f64>,
    pub timeouts: usize,
    pub trajectories: Vec<Vec<f64>>,
    pub ticks_per_second: u32,
    pub max_seconds: f64,
}

impl BatchOutcome {
    #[must_use]
    pub fn for_config(cfg: &BatchConfig) -> Self {
        Self {
            runs: 0,
            survival_secs: Vec::with_capacity(cfg.runs),
            scores: Vec::with_capacity(cfg.runs),
            levels: Vec::new(),
            timeouts: 0,
            trajectories: Vec::with_capacity(cfg.runs),
            ticks_per_second: cfg.ticks_per_second,
            max_seconds: cfg.max_seconds,
        }
    }

    pub fn record(&mut self, run: SimRun) {
        self.runs += 1;
        self.survival_secs.push(run.seconds);
        self.scores.push(run.score);
        if let Some(level) = run.level {
            self.levels.push(level);
        }
        if run.timed_out {
            self.timeouts += 1;
        }
        self.trajectories.push(run.trajectory);
    }

    /// Fold a worker's partial outcome into this one. Vectors are
    /// concatenated in arrival order; per-trial pairing is preserved
    /// inside each partial.
    pub fn absorb(&mut self, partial: Self) {
        self.runs += partial.runs;
        self.survival_secs.extend(partial.survival_secs);
        self.scores.extend(partial.scores);
        self.levels.extend(partial.levels);
        self.timeouts += partial.timeouts;
        self.trajectories.extend(partial.trajectories);
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn timeout_rate(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            self.timeouts as f64 / self.runs as f64
        }
    }
}

/// Run `cfg.runs` trials serially with one scenario and bot built from
/// the batch seed.
pub fn run_batch<S, P>(
    make_scenario: impl FnOnce(u64) -> S,
    make_bot: impl FnOnce(u64) -> P,
    cfg: &BatchConfig,
    progress: Option<&mut ProgressFn<'_>>,
) -> BatchOutcome
where
    S: Scenario,
    P: BotPolicy<S>,
{
    let mut scenario = make_scenario(cfg.seed);
    let mut bot = make_bot(cfg.seed);
    log::debug!(
        "running {} trials of {} under {} (seed {})",
        cfg.runs,
        scenario.name(),
        bot.name(),
        cfg.seed
    );
    run_batch_with(&mut scenario, &mut bot, cfg, progress)
}

/// Serial trial loop over already-constructed collaborators.
pub fn run_batch_with<S, P>(
    scenario: &mut S,
    bot: &mut P,
    cfg: &BatchConfig,
    mut progress: Option<&mut ProgressFn<'_>>,
) -> BatchOutcome
where
    S: Scenario,
    P: BotPolicy<S>,
{
    let trial_cfg = cfg.trial_config();
    let stride = cfg.progress_every.max(1);
    let mut outcome = BatchOutcome::for_config(cfg);

    for index in 0..cfg.runs {
        let run = run_trial(scenario, bot, &trial_cfg);
        let snapshot = BatchProgress {
            run: index + 1,
            total: cfg.runs,
            elapsed_secs: run.seconds,
            score: run.score,
        };
        outcome.record(run);

        if let Some(callback) = progress.as_mut() {
            if snapshot.run % stride == 0 || snapshot.run == cfg.runs {
                callback(snapshot);
            }
        }
    }

    outcome
}
