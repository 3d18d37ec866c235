//! Bootstrap confidence interval around the survival median, with a
//! sample-adequacy verdict.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::stats::{percentile, stddev};

/// Whether the batch size was large enough for a stable median estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleAdequacy {
    Adequate,
    Marginal,
    Insufficient,
}

/// 95% bootstrap interval around the median survival time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceReport {
    pub low: f64,
    pub high: f64,
    pub width: f64,
    pub adequacy: SampleAdequacy,
    /// Run count expected to shrink the interval to roughly one second
    /// either side of the median.
    pub recommended_runs: usize,
}

/// Default resampling iteration count. Empirically chosen calibration
/// value, not an invariant.
pub const BOOTSTRAP_ITERATIONS: usize = 1_000;
/// Interval width (seconds) corresponding to roughly +-1s precision.
pub const TARGET_WIDTH_SECS: f64 = 2.0;

const MARGINAL_WIDTH_SECS: f64 = 6.0;
const TARGET_HALF_WIDTH_SECS: f64 = TARGET_WIDTH_SECS / 2.0;
const CONFIDENCE_Z: f64 = 1.96;
const FALLBACK_RECOMMENDED_RUNS: usize = 100;

impl ConfidenceReport {
    /// Defined fallback for batches too small to resample.
    #[must_use]
    pub const fn degenerate(value: f64, samples: usize) -> Self {
        Self {
            low: value,
            high: value,
            width: 0.0,
            adequacy: SampleAdequacy::Insufficient,
            recommended_runs: if samples > FALLBACK_RECOMMENDED_RUNS {
                samples
            } else {
                FALLBACK_RECOMMENDED_RUNS
            },
        }
    }
}

/// Resample the survival vector with replacement and report the 95%
/// interval of the resampled medians.
///
/// Seeded explicitly so a given analysis replays bit-for-bit. Fewer
/// than two samples short-circuit to a degenerate insufficient report.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn bootstrap_median_ci(values: &[f64], iterations: usize, seed: u64) -> ConfidenceReport {
    let n = values.len();
    if n < 2 {
        return ConfidenceReport::degenerate(values.first().copied().unwrap_or(0.0), n);
    }

    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let iterations = iterations.max(1);
    let mut medians = Vec::with_capacity(iterations);
    let mut resample = vec![0.0_f64; n];
    for _ in 0..iterations {
        for slot in &mut resample {
            *slot = values[rng.random_range(0..n)];
        }
        resample.sort_by(f64::total_cmp);
        medians.push(percentile(&resample, 50.0));
    }
    medians.sort_by(f64::total_cmp);

    let low = percentile(&medians, 2.5);
    let high = percentile(&medians, 97.5);
    let width = high - low;

    let adequacy = if width <= TARGET_WIDTH_SECS {
        SampleAdequacy::Adequate
    } else if width <= MARGINAL_WIDTH_SECS {
        SampleAdequacy::Marginal
    } else {
        SampleAdequacy::Insufficient
    };

    // Standard sample-size estimate for a +-1s interval: grows with the
    // sample variance, independent of how many runs happen to exist now.
    let recommended_runs = if width <= TARGET_WIDTH_SECS {
        n
    } else {
        let sample = (CONFIDENCE_Z * stddev(values) / TARGET_HALF_WIDTH_SECS).powi(2);
        (sample.ceil() as usize).max(n)
    };

    ConfidenceReport {
        low,
        high,
        width,
        adequacy,
        recommended_runs,
    }
}
