//! Binary-search auto-tuner over a black-box batch oracle.
//!
//! The oracle is generally stochastic (seeded bots, random scenarios),
//! so the search is a heuristic hill-climb over a noisy signal rather
//! than a guaranteed root-find: a borderline probe can mis-classify and
//! steer the interval the wrong way. With a deterministic oracle the
//! search itself is deterministic.

use flowgauge_sim::{BatchConfig, BotPolicy, Scenario, probe_seed, run_batch};

use crate::analyzer::{AnalysisResult, Analyzer};
use crate::zone::{HardDirection, ParamHint, Verdict};

/// One tunable parameter's search domain.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub hard_direction: HardDirection,
}

impl ParamSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, min: f64, max: f64, hard_direction: HardDirection) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            hard_direction,
        }
    }
}

/// Immutable `[low, high]` search interval.
///
/// Narrowing is a pure step on the value, so the logic unit-tests in
/// isolation from any simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchState {
    pub low: f64,
    pub high: f64,
}

impl SearchState {
    #[must_use]
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    #[must_use]
    pub const fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        (self.high - self.low).abs()
    }

    /// Halve the interval toward the bound the verdict asks for: the
    /// easier side on too-hard, the harder side on too-easy. A flow
    /// verdict leaves the interval untouched.
    #[must_use]
    pub const fn narrowed(self, verdict: Verdict, hard_direction: HardDirection) -> Self {
        let mid = self.midpoint();
        let higher_is_harder = matches!(hard_direction, HardDirection::Higher);
        match verdict {
            Verdict::Flow => self,
            Verdict::TooHard => {
                if higher_is_harder {
                    Self::new(self.low, mid)
                } else {
                    Self::new(mid, self.high)
                }
            }
            Verdict::TooEasy => {
                if higher_is_harder {
                    Self::new(mid, self.high)
                } else {
                    Self::new(self.low, mid)
                }
            }
        }
    }
}

/// Probe budget and per-probe batch sizing.
#[derive(Debug, Clone, Copy)]
pub struct OptimizerConfig {
    pub max_iterations: usize,
    pub runs_per_probe: usize,
    /// Interval width below which the search stops without success.
    pub epsilon: f64,
    /// Template for every probe batch; `runs` is overridden by
    /// `runs_per_probe` and the seed is re-derived per probe.
    pub batch: BatchConfig,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            runs_per_probe: 50,
            epsilon: 0.001,
            batch: BatchConfig::default(),
        }
    }
}

/// Search outcome. `found == false` means the iteration budget ran out
/// or the interval collapsed, with the most recent probe reported
/// best-effort.
#[derive(Debug, Clone)]
pub struct OptimizerOutcome {
    pub param: String,
    pub value: f64,
    pub result: AnalysisResult,
    pub found: bool,
    pub iterations: usize,
}

/// Binary-search driver using serial batches as its oracle.
///
/// Probes are strictly sequential: each batch completes and classifies
/// before the next midpoint is chosen.
#[derive(Debug, Clone)]
pub struct Optimizer {
    analyzer: Analyzer,
    cfg: OptimizerConfig,
}

impl Optimizer {
    #[must_use]
    pub fn new(analyzer: Analyzer) -> Self {
        Self {
            analyzer,
            cfg: OptimizerConfig::default(),
        }
    }

    #[must_use]
    pub const fn with_config(mut self, cfg: OptimizerConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Search `[param.min, param.max]` for a value whose batch lands in
    /// the flow zone.
    pub fn optimize<S, P, FS, FP>(
        &self,
        make_scenario: &FS,
        make_bot: &FP,
        param: &ParamSpec,
    ) -> OptimizerOutcome
    where
        S: Scenario,
        P: BotPolicy<S>,
        FS: Fn(f64, u64) -> S,
        FP: Fn(u64) -> P,
    {
        let mut state = SearchState::new(param.min, param.max);
        let scenario_name = make_scenario(state.midpoint(), self.cfg.batch.seed)
            .name()
            .to_string();

        let mut found = false;
        let mut iterations = 0;
        let mut last: Option<(f64, AnalysisResult)> = None;

        log::info!(
            "optimizing {} in [{:.3}, {:.3}] ({} runs/probe, {} probes max)",
            param.name,
            param.min,
            param.max,
            self.cfg.runs_per_probe,
            self.cfg.max_iterations
        );

        for iteration in 1..=self.cfg.max_iterations.max(1) {
            iterations = iteration;
            let mid = state.midpoint();

            let mut batch_cfg = self.cfg.batch;
            batch_cfg.runs = self.cfg.runs_per_probe;
            batch_cfg.seed = probe_seed(self.cfg.batch.seed, iteration);

            let outcome = run_batch(
                |seed| make_scenario(mid, seed),
                |seed| make_bot(seed),
                &batch_cfg,
                None,
            );
            let hint = ParamHint {
                name: param.name.clone(),
                min: param.min,
                max: param.max,
                hard_direction: param.hard_direction,
                current: mid,
            };
            let result = self
                .analyzer
                .analyze_with_hint(&scenario_name, &outcome, Some(&hint));

            log::info!(
                "probe {iteration}: {}={mid:.3} -> {} (median {:.1}s, timeout {:.0}%)",
                param.name,
                result.verdict,
                result.survival.median,
                result.timeout_rate * 100.0
            );

            let verdict = result.verdict;
            last = Some((mid, result));

            if verdict == Verdict::Flow {
                found = true;
                break;
            }

            state = state.narrowed(verdict, param.hard_direction);
            if state.width() < self.cfg.epsilon {
                log::debug!(
                    "search interval collapsed below epsilon {} after {iteration} probes",
                    self.cfg.epsilon
                );
                break;
            }
        }

        let (value, result) = last.expect("optimizer always probes at least once");
        OptimizerOutcome {
            param: param.name.clone(),
            value,
            result,
            found,
            iterations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn too_hard_with_higher_is_harder_searches_lower_values() {
        let state = SearchState::new(0.0, 100.0);
        let narrowed = state.narrowed(Verdict::TooHard, HardDirection::Higher);
        assert!((narrowed.low - 0.0).abs() < EPSILON);
        assert!((narrowed.high - 50.0).abs() < EPSILON);
        assert!(narrowed.midpoint() < state.midpoint());
    }

    #[test]
    fn too_hard_with_lower_is_harder_searches_higher_values() {
        let state = SearchState::new(0.0, 100.0);
        let narrowed = state.narrowed(Verdict::TooHard, HardDirection::Lower);
        assert!((narrowed.low - 50.0).abs() < EPSILON);
        assert!(narrowed.midpoint() > state.midpoint());
    }

    #[test]
    fn too_easy_narrows_in_the_opposite_direction() {
        let state = SearchState::new(0.0, 100.0);
        let higher = state.narrowed(Verdict::TooEasy, HardDirection::Higher);
        assert!(higher.midpoint() > state.midpoint());
        let lower = state.narrowed(Verdict::TooEasy, HardDirection::Lower);
        assert!(lower.midpoint() < state.midpoint());
    }

    #[test]
    fn flow_leaves_the_interval_untouched() {
        let state = SearchState::new(2.0, 8.0);
        assert_eq!(state.narrowed(Verdict::Flow, HardDirection::Higher), state);
    }

    #[test]
    fn repeated_narrowing_collapses_the_interval() {
        let mut state = SearchState::new(0.0, 100.0);
        for _ in 0..40 {
            state = state.narrowed(Verdict::TooHard, HardDirection::Higher);
        }
        assert!(state.width() < 1e-6);
        assert!(state.high <= 100.0 && state.low >= 0.0);
    }
}
