//! Flowgauge Simulation Kernel
//!
//! Platform-agnostic trial and batch orchestration for tick-based game
//! loops. The crate knows nothing about any concrete game: scenarios and
//! the bots that drive them arrive through the [`Scenario`] and
//! [`BotPolicy`] contracts, and every trial leaves as raw outcome vectors
//! for the measurement layer to digest.

pub mod batch;
pub mod parallel;
pub mod scenario;
pub mod seed;
pub mod trial;

#[cfg(test)]
mod support;

// Re-export commonly used types
pub use batch::{BatchConfig, BatchOutcome, BatchProgress, ProgressFn, run_batch};
pub use parallel::{BatchError, ParallelConfig, partition_runs, run_batch_parallel};
pub use scenario::{BotPolicy, Scenario};
pub use seed::{probe_seed, worker_seed};
pub use trial::{SimRun, TrialConfig, run_trial};
