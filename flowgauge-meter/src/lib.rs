//! Flowgauge Measurement Layer
//!
//! Turns the raw batch vectors produced by `flowgauge-sim` into durable
//! analysis records: survival summary statistics, distribution shape,
//! bootstrap confidence, flow-zone classification with tuning
//! suggestions, a binary-search parameter optimizer, and a flat-file
//! result history.

pub mod analyzer;
pub mod bootstrap;
pub mod curve;
pub mod history;
pub mod optimizer;
pub mod pattern;
pub mod stats;
pub mod zone;

// Re-export commonly used types
pub use analyzer::{AnalysisResult, Analyzer, AnalyzerConfig, LevelStats};
pub use bootstrap::{
    BOOTSTRAP_ITERATIONS, ConfidenceReport, SampleAdequacy, TARGET_WIDTH_SECS, bootstrap_median_ci,
};
pub use curve::{CurvePattern, EXPONENTIAL_GROWTH_RATIO, ScoreCurve, analyze_score_curve};
pub use history::{DEFAULT_RETENTION, HistoryEntry, HistoryError, ResultHistory};
pub use optimizer::{Optimizer, OptimizerConfig, OptimizerOutcome, ParamSpec, SearchState};
pub use pattern::{DeathCluster, DeathPattern, death_pattern};
pub use stats::{
    HISTOGRAM_BUCKETS, HistogramBucket, SummaryStats, histogram, mean, percentile, stddev,
    summarize,
};
pub use zone::{
    Classification, Genre, HardDirection, LevelPolicy, ParamHint, TimePolicy, Verdict, ZonePolicy,
    ZoneReading, suggestions,
};
