//! Thread-parallel batch farming with a typed worker message protocol.
//!
//! Work fans out to scoped worker threads and results fan back in over
//! an mpsc channel: `Progress` per completed trial, then exactly one
//! `Finished` or `Failed` per worker. Completion order across workers is
//! not guaranteed; aggregation stays order-independent, and per-trial
//! pairing between vectors holds only inside each worker's partial.
//!
//! Any worker failure aborts the whole batch; partial results from the
//! other workers are discarded so downstream statistics stay
//! well-defined. Timeout cancellation is cooperative: threads cannot be
//! killed, so outstanding workers observe an atomic flag at their next
//! trial boundary and wind down while the caller already holds the
//! error.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::batch::{BatchConfig, BatchOutcome, BatchProgress, ProgressFn};
use crate::scenario::{BotPolicy, Scenario};
use crate::seed::worker_seed;
use crate::trial::run_trial;

/// Worker-pool sizing and the batch wall-clock limit.
#[derive(Debug, Clone, Copy)]
pub struct ParallelConfig {
    pub workers: usize,
    pub timeout: Duration,
}

impl ParallelConfig {
    #[must_use]
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            timeout: Duration::from_secs(300),
        }
    }
}

/// Batch-level failure raised by the parallel orchestrator.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("worker {worker} failed: {detail}")]
    WorkerFailed { worker: usize, detail: String },
    #[error("worker channel closed with {outstanding} workers outstanding")]
    ChannelClosed { outstanding: usize },
    #[error("batch exceeded its {limit:?} wall-clock budget with {outstanding} workers outstanding")]
    TimedOut {
        limit: Duration,
        outstanding: usize,
    },
}

enum WorkerMsg {
    Progress { elapsed_secs: f64, score: f64 },
    Finished { outcome: BatchOutcome },
    Failed { worker: usize, detail: String },
}

/// Split `runs` across `workers` as evenly as possible, remainder to the
/// first workers.
#[must_use]
pub fn partition_runs(runs: usize, workers: usize) -> Vec<usize> {
    let workers = workers.max(1);
    let chunk = runs / workers;
    let remainder = runs % workers;
    (0..workers)
        .map(|index| chunk + usize::from(index < remainder))
        .collect()
}

/// Run a batch across isolated worker threads.
///
/// Each worker owns its own scenario and bot, constructed from a derived
/// per-worker seed; nothing mutable is shared between workers. Progress
/// callbacks fire on the calling thread as trial completions arrive,
/// merged across workers.
pub fn run_batch_parallel<S, P, FS, FP>(
    make_scenario: &FS,
    make_bot: &FP,
    cfg: &BatchConfig,
    pool: &ParallelConfig,
    mut progress: Option<&mut ProgressFn<'_>>,
) -> Result<BatchOutcome, BatchError>
where
    S: Scenario,
    P: BotPolicy<S>,
    FS: Fn(u64) -> S + Sync,
    FP: Fn(u64) -> P + Sync,
{
    let shares = partition_runs(cfg.runs, pool.workers);
    log::debug!(
        "farming {} runs across {} workers (timeout {:?})",
        cfg.runs,
        shares.len(),
        pool.timeout
    );
    let cancelled = AtomicBool::new(false);
    let deadline = Instant::now() + pool.timeout;
    let (tx, rx) = mpsc::channel::<WorkerMsg>();

    thread::scope(|scope| {
        for (worker, share) in shares.iter().copied().enumerate() {
            let tx = tx.clone();
            let cancelled = &cancelled;
            let seed = worker_seed(cfg.seed, worker);
            scope.spawn(move || {
                let result = catch_unwind(AssertUnwindSafe(|| {
                    run_worker_share(make_scenario, make_bot, cfg, share, seed, cancelled, &tx)
                }));
                let terminal = match result {
                    Ok(outcome) => WorkerMsg::Finished { outcome },
                    Err(payload) => WorkerMsg::Failed {
                        worker,
                        detail: panic_detail(payload.as_ref()),
                    },
                };
                let _ = tx.send(terminal);
            });
        }
        drop(tx);

        let mut merged = BatchOutcome::for_config(cfg);
        let mut outstanding = shares.len();
        let mut completed = 0_usize;

        while outstanding > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let message = match rx.recv_timeout(remaining) {
                Ok(message) => message,
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    cancelled.store(true, Ordering::Relaxed);
                    log::warn!(
                        "parallel batch timed out after {:?}; cancelling {outstanding} workers",
                        pool.timeout
                    );
                    return Err(BatchError::TimedOut {
                        limit: pool.timeout,
                        outstanding,
                    });
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    cancelled.store(true, Ordering::Relaxed);
                    return Err(BatchError::ChannelClosed { outstanding });
                }
            };

            match message {
                WorkerMsg::Progress {
                    elapsed_secs,
                    score,
                } => {
                    completed += 1;
                    if let Some(callback) = progress.as_mut() {
                        callback(BatchProgress {
                            run: completed,
                            total: cfg.runs,
                            elapsed_secs,
                            score,
                        });
                    }
                }
                WorkerMsg::Finished { outcome } => {
                    merged.absorb(outcome);
                    outstanding -= 1;
                }
                WorkerMsg::Failed { worker, detail } => {
                    cancelled.store(true, Ordering::Relaxed);
                    log::warn!("worker {worker} failed, aborting batch: {detail}");
                    return Err(BatchError::WorkerFailed { worker, detail });
                }
            }
        }

        Ok(merged)
    })
}

fn run_worker_share<S, P, FS, FP>(
    make_scenario: &FS,
    make_bot: &FP,
    cfg: &BatchConfig,
    share: usize,
    seed: u64,
    cancelled: &AtomicBool,
    tx: &mpsc::Sender<WorkerMsg>,
) -> BatchOutcome
where
    S: Scenario,
    P: BotPolicy<S>,
    FS: Fn(u64) -> S,
    FP: Fn(u64) -> P,
{
    let trial_cfg = cfg.trial_config();
    let mut scenario = make_scenario(seed);
    let mut bot = make_bot(seed);
    let mut outcome = BatchOutcome::for_config(cfg);

    for _ in 0..share {
        if cancelled.load(Ordering::Relaxed) {
            break;
        }
        let run = run_trial(&mut scenario, &mut bot, &trial_cfg);
        let _ = tx.send(WorkerMsg::Progress {
            elapsed_secs: run.seconds,
            score: run.score,
        });
        outcome.record(run);
    }

    outcome
}

fn panic_detail(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "opaque panic payload".to_string()
    }
}
