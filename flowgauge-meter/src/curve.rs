//! Score-trajectory growth analysis.

use serde::{Deserialize, Serialize};

/// Growth shape of the mean score trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CurvePattern {
    /// Scores barely move; either survival is too short or there is no
    /// score system to speak of.
    Flat,
    /// Even growth across the run.
    Linear,
    /// Growth concentrated in the second half, typically survivor bias.
    Exponential,
}

/// Column-averaged trajectory plus its growth classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCurve {
    pub buckets: Vec<f64>,
    pub pattern: CurvePattern,
    /// Score per second over the first half of the budget.
    pub growth_first_half: f64,
    /// Score per second over the second half.
    pub growth_second_half: f64,
    pub growth_ratio: f64,
}

/// Second-half to first-half growth ratio at which a curve reads as
/// exponential. Empirically chosen calibration value, not an invariant.
pub const EXPONENTIAL_GROWTH_RATIO: f64 = 1.5;
/// Total growth (points) below which a curve reads as flat.
pub const FLAT_TOTAL_GROWTH: f64 = 1.0;

const NEAR_ZERO_GROWTH: f64 = 0.001;

/// Average the trajectory matrix column-wise and classify the growth
/// shape. Returns `None` when no trajectories were recorded.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn analyze_score_curve(
    trajectories: &[Vec<f64>],
    max_seconds: f64,
    exponential_ratio: f64,
) -> Option<ScoreCurve> {
    let bucket_count = trajectories.first()?.len();
    if bucket_count == 0 {
        return None;
    }

    let rows = trajectories.len() as f64;
    let mut buckets = vec![0.0_f64; bucket_count];
    for curve in trajectories {
        for (index, slot) in buckets.iter_mut().enumerate() {
            *slot += curve.get(index).copied().unwrap_or(0.0);
        }
    }
    for slot in &mut buckets {
        *slot /= rows;
    }

    let half = bucket_count / 2;
    let time_per_bucket = max_seconds / bucket_count as f64;
    let tail = bucket_count - half - 1;

    let growth_first_half = if half > 0 && time_per_bucket > 0.0 {
        (buckets[half] - buckets[0]) / (half as f64 * time_per_bucket)
    } else {
        0.0
    };
    let growth_second_half = if tail > 0 && time_per_bucket > 0.0 {
        (buckets[bucket_count - 1] - buckets[half]) / (tail as f64 * time_per_bucket)
    } else {
        0.0
    };
    let growth_ratio = if growth_first_half > NEAR_ZERO_GROWTH {
        growth_second_half / growth_first_half
    } else {
        1.0
    };

    let total_growth = buckets[bucket_count - 1] - buckets[0];
    let pattern = if total_growth < FLAT_TOTAL_GROWTH {
        CurvePattern::Flat
    } else if growth_ratio >= exponential_ratio {
        CurvePattern::Exponential
    } else {
        CurvePattern::Linear
    };

    Some(ScoreCurve {
        buckets,
        pattern,
        growth_first_half,
        growth_second_half,
        growth_ratio,
    })
}
