//! Flow-zone classification policy, genre presets, and tuning
//! suggestions.
//!
//! Classification is stateless per call and terminal: a reading maps to
//! exactly one of the three verdicts and nothing transitions afterward.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::curve::CurvePattern;
use crate::pattern::DeathCluster;

/// Terminal difficulty verdict for one analyzed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Flow,
    TooHard,
    TooEasy,
}

impl Verdict {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Verdict::Flow => "FLOW",
            Verdict::TooHard => "TOO_HARD",
            Verdict::TooEasy => "TOO_EASY",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Genre presets seeding the time-policy thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Action,
    Rhythm,
    Puzzle,
    Survival,
}

/// Time-based thresholds: how short a median survival reads as too
/// hard, and how many budget-limited runs read as too easy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePolicy {
    pub min_median_secs: f64,
    pub max_timeout_rate: f64,
}

impl TimePolicy {
    #[must_use]
    pub const fn preset(genre: Genre) -> Self {
        match genre {
            Genre::Action => Self {
                min_median_secs: 5.0,
                max_timeout_rate: 0.3,
            },
            Genre::Rhythm => Self {
                min_median_secs: 10.0,
                max_timeout_rate: 0.4,
            },
            Genre::Puzzle => Self {
                min_median_secs: 15.0,
                max_timeout_rate: 0.6,
            },
            Genre::Survival => Self {
                min_median_secs: 8.0,
                max_timeout_rate: 0.2,
            },
        }
    }

    #[must_use]
    pub const fn with_min_median_secs(mut self, secs: f64) -> Self {
        self.min_median_secs = secs;
        self
    }

    #[must_use]
    pub const fn with_max_timeout_rate(mut self, rate: f64) -> Self {
        self.max_timeout_rate = rate;
        self
    }
}

impl Default for TimePolicy {
    fn default() -> Self {
        Self {
            min_median_secs: 5.0,
            max_timeout_rate: 0.5,
        }
    }
}

/// Level-based thresholds for scenarios whose level ladder is a better
/// difficulty signal than raw survival time (tower stackers and the
/// like).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelPolicy {
    pub min_median_level: f64,
    pub max_median_level: f64,
}

impl LevelPolicy {
    #[must_use]
    pub const fn with_min_median_level(mut self, level: f64) -> Self {
        self.min_median_level = level;
        self
    }

    #[must_use]
    pub const fn with_max_median_level(mut self, level: f64) -> Self {
        self.max_median_level = level;
        self
    }
}

impl Default for LevelPolicy {
    fn default() -> Self {
        Self {
            min_median_level: 5.0,
            max_median_level: 25.0,
        }
    }
}

/// Classification policy.
///
/// The level policy, when configured, supersedes the time thresholds
/// for any batch that actually recorded level data; otherwise the time
/// policy decides. Exactly one mode decides a given call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZonePolicy {
    pub time: TimePolicy,
    pub level: Option<LevelPolicy>,
}

impl ZonePolicy {
    #[must_use]
    pub const fn time(time: TimePolicy) -> Self {
        Self { time, level: None }
    }

    #[must_use]
    pub const fn preset(genre: Genre) -> Self {
        Self::time(TimePolicy::preset(genre))
    }

    #[must_use]
    pub const fn with_level(mut self, level: LevelPolicy) -> Self {
        self.level = Some(level);
        self
    }

    /// Map aggregate batch signals to a verdict and its rationale.
    #[must_use]
    pub fn classify(&self, reading: &ZoneReading) -> Classification {
        if let (Some(level), Some(median_level)) = (self.level, reading.median_level) {
            return classify_level(&level, median_level);
        }
        classify_time(&self.time, reading)
    }
}

impl Default for ZonePolicy {
    fn default() -> Self {
        Self {
            time: TimePolicy::default(),
            level: None,
        }
    }
}

/// Aggregate signals the classifier reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneReading {
    pub median_secs: f64,
    pub timeout_rate: f64,
    pub median_level: Option<f64>,
}

/// Verdict plus the human-readable reason it was reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub verdict: Verdict,
    pub rationale: String,
}

fn classify_time(policy: &TimePolicy, reading: &ZoneReading) -> Classification {
    if reading.median_secs < policy.min_median_secs {
        Classification {
            verdict: Verdict::TooHard,
            rationale: format!(
                "Median survival {:.1}s is under the {:.1}s floor; lower the opening difficulty.",
                reading.median_secs, policy.min_median_secs
            ),
        }
    } else if reading.timeout_rate > policy.max_timeout_rate {
        Classification {
            verdict: Verdict::TooEasy,
            rationale: format!(
                "{:.0}% of runs outlast the tick budget (limit {:.0}%); raise the ramp.",
                reading.timeout_rate * 100.0,
                policy.max_timeout_rate * 100.0
            ),
        }
    } else {
        Classification {
            verdict: Verdict::Flow,
            rationale: "Difficulty is balanced; keep the current ramp.".to_string(),
        }
    }
}

fn classify_level(policy: &LevelPolicy, median_level: f64) -> Classification {
    if median_level < policy.min_median_level {
        Classification {
            verdict: Verdict::TooHard,
            rationale: format!(
                "Median level {median_level:.1} falls short of {:.1}; ease the opening difficulty.",
                policy.min_median_level
            ),
        }
    } else if median_level > policy.max_median_level {
        Classification {
            verdict: Verdict::TooEasy,
            rationale: format!(
                "Median level {median_level:.1} overshoots {:.1}; steepen the ramp.",
                policy.max_median_level
            ),
        }
    } else {
        Classification {
            verdict: Verdict::Flow,
            rationale: format!(
                "Median level {median_level:.1} sits inside the {:.0}-{:.0} band; hold this range.",
                policy.min_median_level, policy.max_median_level
            ),
        }
    }
}

const DESPERATE_MEDIAN_SECS: f64 = 2.0;
const RUNAWAY_TIMEOUT_RATE: f64 = 0.8;
const PARAM_STEP_FRACTION: f64 = 0.1;

/// Tuning guidance derived from the verdict and distribution shape.
///
/// Pure function of its inputs. Cluster call-outs append regardless of
/// verdict.
#[must_use]
pub fn suggestions(
    verdict: Verdict,
    reading: &ZoneReading,
    curve: Option<CurvePattern>,
    cluster: DeathCluster,
) -> Vec<String> {
    let mut out = Vec::new();

    match verdict {
        Verdict::TooHard => {
            out.push("Lower the starting difficulty or soften the early-game barrier.".to_string());
            if reading.median_secs < DESPERATE_MEDIAN_SECS {
                out.push(
                    "Bots die inside two seconds; expect to cut the difficulty parameter by \
                     20-30% before the verdict moves."
                        .to_string(),
                );
            }
            if curve == Some(CurvePattern::Flat) {
                out.push(
                    "Scores barely accumulate; extending survival time comes before score tuning."
                        .to_string(),
                );
            }
        }
        Verdict::TooEasy => {
            out.push("Raise the difficulty ramp rate or the starting difficulty.".to_string());
            if reading.timeout_rate > RUNAWAY_TIMEOUT_RATE {
                out.push(format!(
                    "{:.0}% of runs survive the full budget; adjust the timeout threshold or \
                     the difficulty.",
                    reading.timeout_rate * 100.0
                ));
            }
            if curve == Some(CurvePattern::Exponential) {
                out.push(
                    "Late-game score growth is steep; check whether the loop gets easier over \
                     time."
                        .to_string(),
                );
            }
        }
        Verdict::Flow => {
            out.push("Current settings sit in the flow zone; hold this difficulty range.".to_string());
            if curve == Some(CurvePattern::Exponential) {
                out.push(
                    "Score gains concentrate late; worth reviewing the early reward structure \
                     too."
                        .to_string(),
                );
            }
        }
    }

    match cluster {
        DeathCluster::Early => out.push(
            "Deaths cluster in the opening stretch; thin out obstacle density or speed in the \
             first ten seconds."
                .to_string(),
        ),
        DeathCluster::Late => out.push(
            "Most runs survive deep into the budget; review the late-game ramp.".to_string(),
        ),
        DeathCluster::Uniform => {}
    }

    out
}

/// Which way a tunable moves the difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardDirection {
    /// Higher values make the run harder.
    Higher,
    /// Lower values make the run harder.
    Lower,
}

/// A tunable parameter's range, direction, and current value, used to
/// turn a verdict into a concrete proposal.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamHint {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub hard_direction: HardDirection,
    pub current: f64,
}

impl ParamHint {
    /// Proposed new value: one step (10% of the range) toward easier on
    /// a too-hard verdict, toward harder on too-easy, clamped to the
    /// range. A flow verdict proposes nothing.
    #[must_use]
    pub fn proposed_value(&self, verdict: Verdict) -> Option<f64> {
        let toward_harder = match verdict {
            Verdict::TooEasy => true,
            Verdict::TooHard => false,
            Verdict::Flow => return None,
        };
        let step = (self.max - self.min) * PARAM_STEP_FRACTION;
        let raise = (self.hard_direction == HardDirection::Higher) == toward_harder;
        let value = if raise {
            self.current + step
        } else {
            self.current - step
        };
        Some(value.clamp(self.min, self.max))
    }

    /// Suggestion line naming the proposal.
    #[must_use]
    pub fn proposal(&self, verdict: Verdict) -> Option<String> {
        let value = self.proposed_value(verdict)?;
        let direction = if value >= self.current {
            "Raising"
        } else {
            "Lowering"
        };
        Some(format!(
            "{direction} '{}' from {:.2} to {:.2} should move the run toward the flow zone.",
            self.name, self.current, value
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(median_secs: f64, timeout_rate: f64) -> ZoneReading {
        ZoneReading {
            median_secs,
            timeout_rate,
            median_level: None,
        }
    }

    #[test]
    fn short_median_is_too_hard_regardless_of_timeout_rate() {
        let policy = ZonePolicy::default();
        for rate in [0.0, 0.4, 1.0] {
            assert_eq!(
                policy.classify(&reading(2.0, rate)).verdict,
                Verdict::TooHard
            );
        }
    }

    #[test]
    fn high_timeout_rate_is_too_easy_once_median_clears_the_floor() {
        let policy = ZonePolicy::default();
        assert_eq!(
            policy.classify(&reading(20.0, 0.6)).verdict,
            Verdict::TooEasy
        );
    }

    #[test]
    fn between_both_thresholds_is_flow() {
        let policy = ZonePolicy::default();
        let classification = policy.classify(&reading(12.0, 0.2));
        assert_eq!(classification.verdict, Verdict::Flow);
        assert!(!classification.rationale.is_empty());
    }

    #[test]
    fn boundary_values_stay_in_flow() {
        // Thresholds are strict comparisons on both sides.
        let policy = ZonePolicy::default();
        assert_eq!(policy.classify(&reading(5.0, 0.5)).verdict, Verdict::Flow);
    }

    #[test]
    fn genre_presets_shift_the_thresholds() {
        let survival = ZonePolicy::preset(Genre::Survival);
        assert_eq!(
            survival.classify(&reading(7.0, 0.0)).verdict,
            Verdict::TooHard
        );
        assert_eq!(
            survival.classify(&reading(9.0, 0.25)).verdict,
            Verdict::TooEasy
        );

        let puzzle = ZonePolicy::preset(Genre::Puzzle);
        assert_eq!(puzzle.classify(&reading(7.0, 0.0)).verdict, Verdict::TooHard);
        assert_eq!(puzzle.classify(&reading(16.0, 0.55)).verdict, Verdict::Flow);
    }

    #[test]
    fn preset_overrides_apply_field_by_field() {
        let policy = ZonePolicy::time(
            TimePolicy::preset(Genre::Action).with_max_timeout_rate(0.9),
        );
        assert_eq!(policy.time.min_median_secs, 5.0);
        assert_eq!(policy.classify(&reading(20.0, 0.8)).verdict, Verdict::Flow);
    }

    #[test]
    fn level_mode_decides_when_level_data_exists() {
        let policy = ZonePolicy::default().with_level(LevelPolicy::default());
        let low = ZoneReading {
            median_secs: 30.0,
            timeout_rate: 0.0,
            median_level: Some(3.0),
        };
        assert_eq!(policy.classify(&low).verdict, Verdict::TooHard);

        let high = ZoneReading {
            median_level: Some(30.0),
            ..low
        };
        assert_eq!(policy.classify(&high).verdict, Verdict::TooEasy);

        let mid = ZoneReading {
            median_level: Some(12.0),
            ..low
        };
        assert_eq!(policy.classify(&mid).verdict, Verdict::Flow);
    }

    #[test]
    fn level_mode_falls_back_to_time_without_level_data() {
        let policy = ZonePolicy::default().with_level(LevelPolicy::default());
        assert_eq!(policy.classify(&reading(2.0, 0.0)).verdict, Verdict::TooHard);
    }

    #[test]
    fn too_hard_with_tiny_median_earns_the_deep_cut_call_out() {
        let lines = suggestions(
            Verdict::TooHard,
            &reading(1.0, 0.0),
            Some(CurvePattern::Flat),
            DeathCluster::Uniform,
        );
        assert!(lines.iter().any(|l| l.contains("20-30%")));
        assert!(lines.iter().any(|l| l.contains("Scores barely accumulate")));
    }

    #[test]
    fn too_easy_with_runaway_timeouts_names_the_rate() {
        let lines = suggestions(
            Verdict::TooEasy,
            &reading(30.0, 0.9),
            None,
            DeathCluster::Uniform,
        );
        assert!(lines.iter().any(|l| l.contains("90%")));
    }

    #[test]
    fn cluster_call_outs_append_regardless_of_verdict() {
        for verdict in [Verdict::Flow, Verdict::TooHard, Verdict::TooEasy] {
            let lines = suggestions(verdict, &reading(10.0, 0.1), None, DeathCluster::Early);
            assert!(
                lines.iter().any(|l| l.contains("opening stretch")),
                "{verdict} missing early-cluster line"
            );
        }
        let lines = suggestions(Verdict::Flow, &reading(10.0, 0.1), None, DeathCluster::Late);
        assert!(lines.iter().any(|l| l.contains("late-game ramp")));
    }

    fn hint(hard_direction: HardDirection, current: f64) -> ParamHint {
        ParamHint {
            name: "initial_speed".to_string(),
            min: 0.0,
            max: 100.0,
            hard_direction,
            current,
        }
    }

    #[test]
    fn too_hard_moves_a_higher_is_harder_param_down() {
        let proposed = hint(HardDirection::Higher, 50.0).proposed_value(Verdict::TooHard);
        assert_eq!(proposed, Some(40.0));
    }

    #[test]
    fn too_hard_moves_a_lower_is_harder_param_up() {
        let proposed = hint(HardDirection::Lower, 50.0).proposed_value(Verdict::TooHard);
        assert_eq!(proposed, Some(60.0));
    }

    #[test]
    fn too_easy_moves_toward_the_harder_bound() {
        let proposed = hint(HardDirection::Higher, 50.0).proposed_value(Verdict::TooEasy);
        assert_eq!(proposed, Some(60.0));
    }

    #[test]
    fn proposals_clamp_to_the_declared_range() {
        let proposed = hint(HardDirection::Higher, 98.0).proposed_value(Verdict::TooEasy);
        assert_eq!(proposed, Some(100.0));
        let proposed = hint(HardDirection::Higher, 3.0).proposed_value(Verdict::TooHard);
        assert_eq!(proposed, Some(0.0));
    }

    #[test]
    fn flow_verdict_proposes_nothing() {
        assert!(hint(HardDirection::Higher, 50.0).proposal(Verdict::Flow).is_none());
    }
}
