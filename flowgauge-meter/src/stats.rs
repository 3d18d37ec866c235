//! Summary statistics over raw survival vectors.
//!
//! Every function takes a shared slice and leaves it untouched; sorting
//! happens on local copies. Degenerate inputs (empty vectors, collapsed
//! ranges) fall back to defined zero values rather than erroring.

use serde::{Deserialize, Serialize};

/// Percentile of a pre-sorted slice using linear interpolation between
/// order statistics. Empty input yields 0.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let max_index = (sorted.len() - 1) as f64;
    let idx = ((p / 100.0) * max_index).clamp(0.0, max_index);
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * (idx - lo as f64)
    }
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Population standard deviation.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = mean(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Survival-time summary block of an analysis result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub stddev: f64,
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
}

impl SummaryStats {
    /// Zeroed block used for empty batches.
    #[must_use]
    pub const fn zeroed() -> Self {
        Self {
            mean: 0.0,
            median: 0.0,
            min: 0.0,
            max: 0.0,
            stddev: 0.0,
            p25: 0.0,
            p75: 0.0,
            p90: 0.0,
            p95: 0.0,
        }
    }
}

/// Summarize an unsorted value vector.
#[must_use]
pub fn summarize(values: &[f64]) -> SummaryStats {
    if values.is_empty() {
        return SummaryStats::zeroed();
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    SummaryStats {
        mean: mean(values),
        median: percentile(&sorted, 50.0),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        stddev: stddev(values),
        p25: percentile(&sorted, 25.0),
        p75: percentile(&sorted, 75.0),
        p90: percentile(&sorted, 90.0),
        p95: percentile(&sorted, 95.0),
    }
}

/// One bucket of the survival histogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub from: f64,
    pub to: f64,
    pub count: usize,
}

/// Bucket count used by the analyzer's survival histogram.
pub const HISTOGRAM_BUCKETS: usize = 10;

/// Fixed-bucket histogram spanning `[min, max]` of the input. A
/// collapsed range yields a single full bucket; empty input yields no
/// buckets.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn histogram(values: &[f64], buckets: usize) -> Vec<HistogramBucket> {
    if values.is_empty() || buckets == 0 {
        return Vec::new();
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &value in values {
        min = min.min(value);
        max = max.max(value);
    }
    if (max - min).abs() < f64::EPSILON {
        return vec![HistogramBucket {
            from: min,
            to: max,
            count: values.len(),
        }];
    }

    let step = (max - min) / buckets as f64;
    let mut out: Vec<HistogramBucket> = (0..buckets)
        .map(|index| HistogramBucket {
            from: min + index as f64 * step,
            to: min + (index + 1) as f64 * step,
            count: 0,
        })
        .collect();
    for &value in values {
        let index = (((value - min) / step) as usize).min(buckets - 1);
        out[index].count += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_of_empty_input_is_zero() {
        assert_eq!(percentile(&[], 50.0), 0.0);
    }

    #[test]
    fn median_of_odd_length_is_middle_element() {
        let sorted = [1.0, 2.0, 9.0];
        assert_eq!(percentile(&sorted, 50.0), 2.0);
    }

    #[test]
    fn median_of_even_length_averages_middle_pair() {
        let sorted = [1.0, 2.0, 4.0, 9.0];
        assert_eq!(percentile(&sorted, 50.0), 3.0);
    }

    #[test]
    fn percentile_interpolates_between_order_statistics() {
        let sorted = [0.0, 10.0];
        assert!((percentile(&sorted, 25.0) - 2.5).abs() < 1e-9);
        assert!((percentile(&sorted, 75.0) - 7.5).abs() < 1e-9);
    }

    #[test]
    fn percentile_endpoints_hit_min_and_max() {
        let sorted = [3.0, 5.0, 8.0, 13.0];
        assert_eq!(percentile(&sorted, 0.0), 3.0);
        assert_eq!(percentile(&sorted, 100.0), 13.0);
    }

    #[test]
    fn summarize_handles_empty_input() {
        assert_eq!(summarize(&[]), SummaryStats::zeroed());
    }

    #[test]
    fn summarize_reports_population_spread() {
        let stats = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.stddev, 2.0);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
    }

    #[test]
    fn histogram_collapsed_range_yields_single_full_bucket() {
        let buckets = histogram(&[3.0, 3.0, 3.0], 10);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].count, 3);
        assert_eq!(buckets[0].from, 3.0);
    }

    #[test]
    fn histogram_counts_every_value_once() {
        let values: Vec<f64> = (0..50).map(f64::from).collect();
        let buckets = histogram(&values, 10);
        assert_eq!(buckets.len(), 10);
        let total: usize = buckets.iter().map(|b| b.count).sum();
        assert_eq!(total, values.len());
    }

    #[test]
    fn histogram_max_value_lands_in_last_bucket() {
        let buckets = histogram(&[0.0, 10.0], 10);
        assert_eq!(buckets[9].count, 1);
        assert_eq!(buckets[0].count, 1);
    }
}
