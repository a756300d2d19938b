//! Fan-in aggregation: the single consumer of the size-event stream.
//!
//! The aggregator runs a three-way `select!` over size events, the
//! cancellation observer, and an optional progress tick, reacting to
//! whichever is ready first. On cancellation it keeps draining the stream
//! until it closes, so producers blocked on the rendezvous send always
//! find a consumer and the pipeline reaches quiescence in bounded time.

use std::time::Instant;

use crossbeam_channel as channel;
use crossbeam_channel::select;

use crate::scan::cancel::CancelToken;

/// Running totals for one scan. Monotonically non-decreasing while the
/// scan runs; only the aggregator mutates them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanTotals {
    /// Number of files counted so far.
    pub files: u64,
    /// Sum of their byte sizes.
    pub bytes: u64,
}

/// How the aggregation loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The size-event stream closed after every traversal task finished.
    Completed,
    /// The cancellation signal was observed; the stream was drained.
    Cancelled,
}

/// Final aggregation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Totals at the moment the loop terminated. After cancellation these
    /// are the partial totals accumulated up to the signal.
    pub totals: ScanTotals,
    /// Which terminal state was reached.
    pub termination: Termination,
}

/// Consume the size-event stream until it closes or the scan is cancelled.
///
/// `tick` enables periodic progress reporting: each tick invokes
/// `on_progress` with the current totals. Pass `None` to disable.
///
/// Events arriving after cancellation are received and discarded; the
/// drain ends only when the stream closes, which is the producers-finished
/// signal. Totals accumulated before the signal are returned either way.
pub fn aggregate<F>(
    sizes: &channel::Receiver<u64>,
    cancel: &CancelToken,
    tick: Option<&channel::Receiver<Instant>>,
    mut on_progress: F,
) -> ScanOutcome
where
    F: FnMut(&ScanTotals),
{
    // A never-firing channel stands in for a disabled tick, keeping the
    // select shape fixed.
    let silent = channel::never();
    let ticker = tick.unwrap_or(&silent);

    let mut totals = ScanTotals::default();
    loop {
        select! {
            recv(cancel.observe()) -> _ => {
                // Drain so in-flight producers never block forever on the
                // rendezvous send. Ends when the last producer exits.
                while sizes.recv().is_ok() {}
                return ScanOutcome {
                    totals,
                    termination: Termination::Cancelled,
                };
            }
            recv(sizes) -> event => match event {
                Ok(size) => {
                    totals.files += 1;
                    totals.bytes += size;
                }
                Err(_) => {
                    return ScanOutcome {
                        totals,
                        termination: Termination::Completed,
                    };
                }
            },
            recv(ticker) -> _ => on_progress(&totals),
        }
    }
}
