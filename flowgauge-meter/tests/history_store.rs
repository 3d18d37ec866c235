use std::fs;
use std::path::PathBuf;

use flowgauge_meter::{AnalysisResult, Analyzer, ResultHistory, ZonePolicy};
use flowgauge_sim::{BatchConfig, BatchOutcome};

fn temp_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "flowgauge-history-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn sample_result(name: &str, median_secs: f64) -> AnalysisResult {
    let cfg = BatchConfig::new(30);
    let mut outcome = BatchOutcome::for_config(&cfg);
    outcome.runs = 30;
    outcome.survival_secs = vec![median_secs; 30];
    outcome.scores = vec![median_secs * 4.0; 30];
    outcome.trajectories = vec![vec![1.0; 20]; 30];
    Analyzer::new(ZonePolicy::default()).analyze(name, &outcome)
}

#[test]
fn saved_snapshot_round_trips() {
    let dir = temp_dir("roundtrip");
    let history = ResultHistory::new(&dir, 5);
    let result = sample_result("roundtrip", 12.0);

    let path = history.save(&result).expect("save snapshot");
    assert!(path.exists());

    let entries = history.recent();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].result, result);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn retention_cap_evicts_the_oldest_snapshots() {
    let dir = temp_dir("evict");
    let history = ResultHistory::new(&dir, 3);
    for index in 0..5 {
        let result = sample_result(&format!("run-{index}"), 8.0);
        history.save(&result).expect("save snapshot");
    }

    let files: Vec<_> = fs::read_dir(&dir)
        .expect("read history dir")
        .filter_map(Result::ok)
        .collect();
    assert_eq!(files.len(), 3);

    let entries = history.recent();
    assert_eq!(entries.len(), 3);
    // Newest first; the two oldest runs are gone.
    assert_eq!(entries[0].result.name, "run-4");
    assert_eq!(entries[2].result.name, "run-2");

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn unparsable_snapshots_are_skipped() {
    let dir = temp_dir("garbage");
    let history = ResultHistory::new(&dir, 5);
    history
        .save(&sample_result("valid", 9.0))
        .expect("save snapshot");
    fs::write(dir.join("zz-corrupt.json"), b"{ not json").expect("write garbage");

    let entries = history.recent();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].result.name, "valid");

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn recent_on_a_missing_directory_is_empty() {
    let history = ResultHistory::new(temp_dir("missing"), 5);
    assert!(history.recent().is_empty());
}
