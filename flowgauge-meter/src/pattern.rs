//! Death-pattern analysis: where along the survival distribution the
//! failures cluster.

use serde::{Deserialize, Serialize};

use crate::stats;

/// Where trial deaths concentrate across the survival distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCluster {
    /// Mass concentrated at short survival with a long right tail.
    Early,
    /// Mirrored case: most runs survive long.
    Late,
    Uniform,
}

/// Shape descriptor of the survival-seconds distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeathPattern {
    pub skewness: f64,
    pub kurtosis: f64,
    pub cluster: DeathCluster,
}

impl DeathPattern {
    #[must_use]
    pub const fn uniform() -> Self {
        Self {
            skewness: 0.0,
            kurtosis: 0.0,
            cluster: DeathCluster::Uniform,
        }
    }
}

/// Skewness above which deaths read as early-clustered.
pub const EARLY_SKEWNESS: f64 = 1.0;
/// Skewness below which deaths read as late-clustered.
pub const LATE_SKEWNESS: f64 = -1.0;

const DEGENERATE_STDDEV: f64 = 1e-9;

/// Bias-corrected sample skewness (Fisher-Pearson g1) and excess
/// kurtosis of the survival vector.
///
/// Fewer than two samples or a near-zero spread short-circuit to the
/// uniform pattern with zeroed moments.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn death_pattern(times: &[f64]) -> DeathPattern {
    let n = times.len();
    if n < 2 {
        return DeathPattern::uniform();
    }
    let mean = stats::mean(times);
    let stddev = stats::stddev(times);
    if stddev < DEGENERATE_STDDEV {
        return DeathPattern::uniform();
    }

    let n_f = n as f64;
    let skewness = if n < 3 {
        0.0
    } else {
        let third: f64 = times.iter().map(|&t| ((t - mean) / stddev).powi(3)).sum();
        n_f / ((n_f - 1.0) * (n_f - 2.0)) * third
    };
    let fourth: f64 = times.iter().map(|&t| ((t - mean) / stddev).powi(4)).sum();
    let kurtosis = fourth / n_f - 3.0;

    let cluster = if skewness > EARLY_SKEWNESS {
        DeathCluster::Early
    } else if skewness < LATE_SKEWNESS {
        DeathCluster::Late
    } else {
        DeathCluster::Uniform
    };

    DeathPattern {
        skewness,
        kurtosis,
        cluster,
    }
}
