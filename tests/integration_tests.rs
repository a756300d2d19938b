//! Integration tests: full scan pipelines over real temporary directory
//! trees, plus end-to-end cancellation through the public API.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel as channel;
use tempfile::TempDir;

use duscan::prelude::*;

fn scan_config(roots: Vec<PathBuf>, read_concurrency: usize) -> ScanConfig {
    ScanConfig {
        roots,
        read_concurrency,
        workers: 4,
    }
}

fn run_to_completion(config: &ScanConfig) -> (ScanOutcome, Vec<Diagnostic>) {
    let cancel = CancelToken::new();
    let traversal = Traversal::spawn(config, Arc::new(FsSource), &cancel);
    let outcome = aggregate(&traversal.sizes, &cancel, None, |_| {});
    let diags = traversal.diagnostics.iter().collect();
    (outcome, diags)
}

/// Build a three-level tree with a known shape: 110 files, 11_000 bytes.
fn build_tree(root: &Path) {
    for d in 0..10 {
        let dir = root.join(format!("dir{d}"));
        let nested = dir.join("nested");
        fs::create_dir_all(&nested).unwrap();
        for f in 0..5 {
            fs::write(dir.join(format!("f{f}.bin")), vec![0u8; 100]).unwrap();
            fs::write(nested.join(format!("g{f}.bin")), vec![0u8; 100]).unwrap();
        }
    }
    for f in 0..10 {
        fs::write(root.join(format!("top{f}.bin")), vec![0u8; 100]).unwrap();
    }
}

#[test]
fn full_pipeline_counts_exactly() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path());

    let (outcome, diags) = run_to_completion(&scan_config(vec![tmp.path().to_path_buf()], 20));
    assert_eq!(outcome.termination, Termination::Completed);
    assert_eq!(outcome.totals.files, 110);
    assert_eq!(outcome.totals.bytes, 11_000);
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
}

#[test]
fn gate_capacity_does_not_change_totals() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path());

    let mut seen = Vec::new();
    for capacity in [1, 2, 20] {
        let (outcome, _) = run_to_completion(&scan_config(vec![tmp.path().to_path_buf()], capacity));
        assert_eq!(outcome.termination, Termination::Completed);
        seen.push(outcome.totals);
    }
    assert!(seen.windows(2).all(|pair| pair[0] == pair[1]), "{seen:?}");
}

#[test]
fn multiple_roots_sum_together() {
    let one = TempDir::new().unwrap();
    let two = TempDir::new().unwrap();
    fs::write(one.path().join("a.bin"), vec![0u8; 40]).unwrap();
    fs::write(two.path().join("b.bin"), vec![0u8; 60]).unwrap();

    let (outcome, _) = run_to_completion(&scan_config(
        vec![one.path().to_path_buf(), two.path().to_path_buf()],
        20,
    ));
    assert_eq!(outcome.totals.files, 2);
    assert_eq!(outcome.totals.bytes, 100);
}

#[test]
fn nonexistent_root_reports_diagnostic_and_terminates() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("real.bin"), vec![0u8; 10]).unwrap();
    let missing = PathBuf::from("/definitely/does/not/exist");

    let (outcome, diags) = run_to_completion(&scan_config(
        vec![tmp.path().to_path_buf(), missing.clone()],
        20,
    ));
    assert_eq!(outcome.termination, Termination::Completed);
    // The healthy root is still fully counted.
    assert_eq!(outcome.totals.files, 1);
    assert_eq!(outcome.totals.bytes, 10);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].path, missing);
}

#[test]
fn empty_directory_scans_to_zero() {
    let tmp = TempDir::new().unwrap();
    let (outcome, diags) = run_to_completion(&scan_config(vec![tmp.path().to_path_buf()], 20));
    assert_eq!(outcome.termination, Termination::Completed);
    assert_eq!(outcome.totals, ScanTotals::default());
    assert!(diags.is_empty());
}

#[test]
fn verbose_ticks_fire_during_slow_scans() {
    /// Synthetic source slow enough that ticks land mid-scan.
    struct SlowWideSource;

    impl DirectorySource for SlowWideSource {
        fn read_dir(&self, path: &Path) -> DirListing {
            thread::sleep(Duration::from_millis(5));
            if path == Path::new("/root") {
                let entries = (0..20)
                    .map(|i| EntryInfo {
                        name: format!("d{i}").into(),
                        is_dir: true,
                        size_bytes: 0,
                    })
                    .collect();
                DirListing {
                    entries,
                    error: None,
                }
            } else {
                DirListing {
                    entries: vec![EntryInfo {
                        name: "f".into(),
                        is_dir: false,
                        size_bytes: 1,
                    }],
                    error: None,
                }
            }
        }
    }

    let cancel = CancelToken::new();
    let traversal = Traversal::spawn(
        &ScanConfig {
            roots: vec![PathBuf::from("/root")],
            read_concurrency: 2,
            workers: 2,
        },
        Arc::new(SlowWideSource),
        &cancel,
    );

    let ticker = channel::tick(Duration::from_millis(10));
    let mut reports = 0u32;
    let outcome = aggregate(&traversal.sizes, &cancel, Some(&ticker), |_| {
        reports += 1;
    });

    assert_eq!(outcome.termination, Termination::Completed);
    assert_eq!(outcome.totals.files, 20);
    assert!(reports >= 1, "expected progress reports during a slow scan");
}

#[test]
fn cancellation_ends_cleanly_with_partial_totals() {
    /// Endless synthetic tree; only cancellation can stop it.
    struct EndlessSource;

    impl DirectorySource for EndlessSource {
        fn read_dir(&self, _path: &Path) -> DirListing {
            DirListing {
                entries: vec![
                    EntryInfo {
                        name: "sub".into(),
                        is_dir: true,
                        size_bytes: 0,
                    },
                    EntryInfo {
                        name: "f".into(),
                        is_dir: false,
                        size_bytes: 2,
                    },
                ],
                error: None,
            }
        }
    }

    let cancel = CancelToken::new();
    let traversal = Traversal::spawn(
        &ScanConfig {
            roots: vec![PathBuf::from("/root")],
            read_concurrency: 4,
            workers: 4,
        },
        Arc::new(EndlessSource),
        &cancel,
    );

    let sizes = traversal.sizes.clone();
    let agg_cancel = cancel.clone();
    let aggregator = thread::spawn(move || aggregate(&sizes, &agg_cancel, None, |_| {}));

    thread::sleep(Duration::from_millis(40));
    cancel.cancel();

    let started = Instant::now();
    let outcome = aggregator.join().unwrap();

    assert_eq!(outcome.termination, Termination::Cancelled);
    assert!(outcome.totals.files > 0);
    assert_eq!(outcome.totals.bytes, outcome.totals.files * 2);
    assert!(started.elapsed() < Duration::from_secs(5));
}
