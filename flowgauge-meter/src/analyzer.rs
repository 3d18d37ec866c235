//! Batch analysis: turn raw outcome vectors into the durable result
//! record.

use flowgauge_sim::BatchOutcome;
use serde::{Deserialize, Serialize};

use crate::bootstrap::{self, BOOTSTRAP_ITERATIONS, ConfidenceReport};
use crate::curve::{self, EXPONENTIAL_GROWTH_RATIO, ScoreCurve};
use crate::pattern::{self, DeathPattern};
use crate::stats::{self, HISTOGRAM_BUCKETS, HistogramBucket, SummaryStats};
use crate::zone::{ParamHint, Verdict, ZonePolicy, ZoneReading, suggestions};

/// Level summary, present only when the scenario tracks a level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelStats {
    pub mean: f64,
    pub median: f64,
    pub max: f64,
    pub p25: f64,
    pub p75: f64,
}

/// Durable output record for one analyzed batch.
///
/// Immutable once produced; this is the unit persisted to history and
/// compared across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub name: String,
    pub runs: usize,
    pub survival: SummaryStats,
    pub histogram: Vec<HistogramBucket>,
    pub timeout_rate: f64,
    pub score_mean: f64,
    pub score_max: f64,
    pub level_stats: Option<LevelStats>,
    pub score_curve: Option<ScoreCurve>,
    pub death_pattern: DeathPattern,
    pub confidence: ConfidenceReport,
    pub verdict: Verdict,
    pub rationale: String,
    pub suggestions: Vec<String>,
}

/// Calibration knobs for the analyzer. The growth ratio and bootstrap
/// iteration count are empirically chosen values kept configurable
/// rather than hard-wired.
#[derive(Debug, Clone, Copy)]
pub struct AnalyzerConfig {
    pub histogram_buckets: usize,
    pub bootstrap_iterations: usize,
    pub bootstrap_seed: u64,
    pub exponential_growth_ratio: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            histogram_buckets: HISTOGRAM_BUCKETS,
            bootstrap_iterations: BOOTSTRAP_ITERATIONS,
            bootstrap_seed: 1337,
            exponential_growth_ratio: EXPONENTIAL_GROWTH_RATIO,
        }
    }
}

/// Analysis pipeline from batch vectors to the result record. Pure: the
/// same outcome and configuration always produce the same record.
#[derive(Debug, Clone)]
pub struct Analyzer {
    policy: ZonePolicy,
    cfg: AnalyzerConfig,
}

impl Analyzer {
    #[must_use]
    pub fn new(policy: ZonePolicy) -> Self {
        Self {
            policy,
            cfg: AnalyzerConfig::default(),
        }
    }

    #[must_use]
    pub const fn with_config(mut self, cfg: AnalyzerConfig) -> Self {
        self.cfg = cfg;
        self
    }

    #[must_use]
    pub const fn policy(&self) -> &ZonePolicy {
        &self.policy
    }

    #[must_use]
    pub fn analyze(&self, name: &str, outcome: &BatchOutcome) -> AnalysisResult {
        self.analyze_with_hint(name, outcome, None)
    }

    /// Analyze a batch, appending a concrete parameter proposal when the
    /// tunable's range and hard direction are known.
    #[must_use]
    pub fn analyze_with_hint(
        &self,
        name: &str,
        outcome: &BatchOutcome,
        hint: Option<&ParamHint>,
    ) -> AnalysisResult {
        let survival = stats::summarize(&outcome.survival_secs);
        let histogram = stats::histogram(&outcome.survival_secs, self.cfg.histogram_buckets);
        let timeout_rate = outcome.timeout_rate();

        let score_max = outcome
            .scores
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let level_stats = level_stats(&outcome.levels);

        let score_curve = curve::analyze_score_curve(
            &outcome.trajectories,
            outcome.max_seconds,
            self.cfg.exponential_growth_ratio,
        );
        let death_pattern = pattern::death_pattern(&outcome.survival_secs);
        let confidence = bootstrap::bootstrap_median_ci(
            &outcome.survival_secs,
            self.cfg.bootstrap_iterations,
            self.cfg.bootstrap_seed,
        );

        let reading = ZoneReading {
            median_secs: survival.median,
            timeout_rate,
            median_level: level_stats.map(|stats| stats.median),
        };
        let classification = self.policy.classify(&reading);
        let mut lines = suggestions(
            classification.verdict,
            &reading,
            score_curve.as_ref().map(|curve| curve.pattern),
            death_pattern.cluster,
        );
        if let Some(hint) = hint {
            if let Some(line) = hint.proposal(classification.verdict) {
                lines.push(line);
            }
        }

        AnalysisResult {
            name: name.to_string(),
            runs: outcome.runs,
            survival,
            histogram,
            timeout_rate,
            score_mean: stats::mean(&outcome.scores),
            score_max: if score_max.is_finite() { score_max } else { 0.0 },
            level_stats,
            score_curve,
            death_pattern,
            confidence,
            verdict: classification.verdict,
            rationale: classification.rationale,
            suggestions: lines,
        }
    }
}

fn level_stats(levels: &[f64]) -> Option<LevelStats> {
    if levels.is_empty() {
        return None;
    }
    let mut sorted = levels.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(LevelStats {
        mean: stats::mean(levels),
        median: stats::percentile(&sorted, 50.0),
        max: sorted[sorted.len() - 1],
        p25: stats::percentile(&sorted, 25.0),
        p75: stats::percentile(&sorted, 75.0),
    })
}
