//! Append-only result snapshots with most-recent-N retention.
//!
//! Each analysis lands as one flat JSON file whose name sorts by
//! creation order (timestamp prefix plus a sequence counter), so
//! eviction is a lexicographic drop of the oldest files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analyzer::AnalysisResult;

/// History I/O failure.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history io: {0}")]
    Io(#[from] std::io::Error),
    #[error("history serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One persisted snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub saved_at: DateTime<Utc>,
    pub result: AnalysisResult,
}

/// Default retention cap.
pub const DEFAULT_RETENTION: usize = 10;

/// Flat-file JSON store for analysis results.
#[derive(Debug)]
pub struct ResultHistory {
    dir: PathBuf,
    cap: usize,
    seq: AtomicU64,
}

impl ResultHistory {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, cap: usize) -> Self {
        Self {
            dir: dir.into(),
            cap: cap.max(1),
            seq: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Append a snapshot, then evict the oldest files beyond the
    /// retention cap.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError` when the directory cannot be created or
    /// the snapshot cannot be serialized or written.
    pub fn save(&self, result: &AnalysisResult) -> Result<PathBuf, HistoryError> {
        fs::create_dir_all(&self.dir)?;
        let saved_at = Utc::now();
        let stamp = saved_at.format("%Y-%m-%dT%H-%M-%S%.3f");
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let path = self.dir.join(format!("{stamp}-{seq:06}.json"));

        let entry = HistoryEntry {
            saved_at,
            result: result.clone(),
        };
        fs::write(&path, serde_json::to_vec_pretty(&entry)?)?;

        self.evict_oldest();
        Ok(path)
    }

    /// Most recent entries, newest first. Unreadable or unparsable
    /// files are skipped with a warning.
    #[must_use]
    pub fn recent(&self) -> Vec<HistoryEntry> {
        let mut files = self.snapshot_files();
        files.sort();
        files.reverse();
        files.truncate(self.cap);

        let mut entries = Vec::with_capacity(files.len());
        for path in files {
            match read_entry(&path) {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    log::warn!("skipping history file {}: {err}", path.display());
                }
            }
        }
        entries
    }

    fn snapshot_files(&self) -> Vec<PathBuf> {
        let Ok(read_dir) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        read_dir
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect()
    }

    fn evict_oldest(&self) {
        let mut files = self.snapshot_files();
        if files.len() <= self.cap {
            return;
        }
        files.sort();
        let excess = files.len() - self.cap;
        for path in files.into_iter().take(excess) {
            if let Err(err) = fs::remove_file(&path) {
                log::warn!("failed to evict history file {}: {err}", path.display());
            }
        }
    }
}

fn read_entry(path: &Path) -> Result<HistoryEntry, HistoryError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
