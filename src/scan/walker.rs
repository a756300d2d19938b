//! Worker-pool directory traversal with gated reads and fan-in size events.
//!
//! The walker is the producer half of the scan: a fixed pool of worker
//! threads pulls directories off an unbounded work queue, lists each one
//! through the [`DirectorySource`] (admission-controlled by the
//! [`ReadGate`]), emits one size event per file, and queues every
//! subdirectory as new work. Pending work is unbounded by design; only the
//! listing step is capacity-limited.
//!
//! Termination: an in-flight counter is incremented for every queued
//! directory (roots included) and decremented when its processing finishes.
//! Workers exit once the counter reads zero, and the last worker dropping
//! its sender closes the size-event stream exactly once.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam_channel as channel;

use crate::scan::cancel::CancelToken;
use crate::scan::gate::{GateAdmission, ReadGate};
use crate::scan::source::DirectorySource;

/// How long a worker waits for new work before re-checking the in-flight
/// counter for termination.
const WORK_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Traversal configuration.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root directories to scan.
    pub roots: Vec<PathBuf>,
    /// Cap on concurrently active directory reads.
    pub read_concurrency: usize,
    /// Worker threads pulling from the work queue.
    pub workers: usize,
}

/// Non-fatal read failure, tagged with the path it occurred on.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Directory the failure occurred on.
    pub path: PathBuf,
    /// Underlying error text.
    pub message: String,
}

/// Handle to a running traversal.
///
/// `sizes` closes when every queued directory has been processed; that is
/// the aggregator's completion signal. `diagnostics` closes at the same
/// point and is unbounded, so it may also be drained afterwards.
pub struct Traversal {
    /// One event per discovered file: its byte size. Rendezvous channel;
    /// producers block until the consumer accepts each event.
    pub sizes: channel::Receiver<u64>,
    /// Per-directory read failures, reported as they occur.
    pub diagnostics: channel::Receiver<Diagnostic>,
}

impl Traversal {
    /// Start the traversal in background worker threads.
    ///
    /// Nonexistent or unreadable roots are reported on `diagnostics` like
    /// any other directory-open failure; they never abort the scan.
    #[must_use]
    pub fn spawn(config: &ScanConfig, source: Arc<dyn DirectorySource>, cancel: &CancelToken) -> Self {
        let workers = config.workers.max(1);
        let gate = ReadGate::new(config.read_concurrency);

        // Work queue is unbounded: queueing a subdirectory must never block
        // a worker, or a full queue could deadlock the pool against itself.
        let (work_tx, work_rx) = channel::unbounded::<PathBuf>();
        // Rendezvous stream: one event per file, accepted one at a time by
        // the aggregator (or its drain loop after cancellation).
        let (size_tx, size_rx) = channel::bounded::<u64>(0);
        let (diag_tx, diag_rx) = channel::unbounded::<Diagnostic>();

        // In-flight counter: queued-but-unfinished directories.
        let in_flight = Arc::new(AtomicUsize::new(0));

        // Seed the queue with the roots before any worker starts.
        for root in &config.roots {
            in_flight.fetch_add(1, Ordering::Release);
            let _ = work_tx.send(root.clone());
        }

        for _ in 0..workers {
            let work_rx = work_rx.clone();
            let work_tx = work_tx.clone();
            let size_tx = size_tx.clone();
            let diag_tx = diag_tx.clone();
            let in_flight = Arc::clone(&in_flight);
            let gate = gate.clone();
            let cancel = cancel.clone();
            let source = Arc::clone(&source);

            thread::spawn(move || {
                walker_thread(
                    &work_rx, &work_tx, &size_tx, &diag_tx, &in_flight, &gate, &cancel, &*source,
                );
            });
        }

        // Workers hold the only remaining senders; the streams close when
        // the last worker exits.
        Self {
            sizes: size_rx,
            diagnostics: diag_rx,
        }
    }
}

/// Worker loop: process directories until the in-flight counter hits zero.
#[allow(clippy::too_many_arguments)]
fn walker_thread(
    work_rx: &channel::Receiver<PathBuf>,
    work_tx: &channel::Sender<PathBuf>,
    size_tx: &channel::Sender<u64>,
    diag_tx: &channel::Sender<Diagnostic>,
    in_flight: &AtomicUsize,
    gate: &ReadGate,
    cancel: &CancelToken,
    source: &dyn DirectorySource,
) {
    loop {
        match work_rx.recv_timeout(WORK_POLL_INTERVAL) {
            Ok(dir_path) => {
                process_directory(
                    &dir_path, work_tx, size_tx, diag_tx, in_flight, gate, cancel, source,
                );
                // The decrement happens after processing so the counter can
                // only reach zero once no descendant remains unqueued.
                in_flight.fetch_sub(1, Ordering::AcqRel);
            }
            Err(channel::RecvTimeoutError::Timeout) => {
                if in_flight.load(Ordering::Acquire) == 0 {
                    return;
                }
            }
            Err(channel::RecvTimeoutError::Disconnected) => return,
        }
    }
}

/// Process one directory: gated read, emit file sizes, queue subdirectories.
#[allow(clippy::too_many_arguments)]
fn process_directory(
    dir_path: &Path,
    work_tx: &channel::Sender<PathBuf>,
    size_tx: &channel::Sender<u64>,
    diag_tx: &channel::Sender<Diagnostic>,
    in_flight: &AtomicUsize,
    gate: &ReadGate,
    cancel: &CancelToken,
    source: &dyn DirectorySource,
) {
    // Cheap exit before any I/O once cancellation is raised.
    if cancel.is_cancelled() {
        return;
    }

    // The permit covers only the listing itself, never the event sends:
    // a producer blocked on the rendezvous stream must not pin a read slot.
    let listing = {
        let permit = match gate.acquire(cancel) {
            GateAdmission::Admitted(permit) => permit,
            GateAdmission::Aborted => return,
        };
        let listing = source.read_dir(dir_path);
        drop(permit);
        listing
    };

    if let Some(message) = listing.error {
        let _ = diag_tx.send(Diagnostic {
            path: dir_path.to_path_buf(),
            message,
        });
    }

    // Partial listings still contribute everything they contain.
    for entry in listing.entries {
        if entry.is_dir {
            in_flight.fetch_add(1, Ordering::Release);
            let _ = work_tx.send(dir_path.join(&entry.name));
        } else if size_tx.send(entry.size_bytes).is_err() {
            // Consumer gone entirely; nothing left to report to.
            return;
        }
    }
}
