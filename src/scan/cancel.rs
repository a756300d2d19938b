//! Scan-scoped cancellation token: write-once, idempotent, observable both
//! by non-blocking polls and from a `select!` arm.
//!
//! Two views of the same state are kept in sync: an atomic flag for cheap
//! checks at task boundaries, and a crossbeam channel whose sender is
//! dropped when the token is raised. The broken channel makes every
//! `recv`-style wait on [`CancelToken::observe`] complete immediately,
//! which is what lets the gate and the aggregator select on cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel as channel;
use parking_lot::Mutex;

/// Cooperative, level-triggered cancellation signal for one scan.
///
/// Clones share state: raising any clone raises them all, and the signal
/// never reverts for the lifetime of the scan.
#[derive(Clone)]
pub struct CancelToken {
    raised: Arc<AtomicBool>,
    // Dropped on cancel; disconnects `observer` for every clone.
    keeper: Arc<Mutex<Option<channel::Sender<()>>>>,
    observer: channel::Receiver<()>,
}

impl CancelToken {
    /// Create a fresh, un-raised token.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = channel::bounded::<()>(0);
        Self {
            raised: Arc::new(AtomicBool::new(false)),
            keeper: Arc::new(Mutex::new(Some(tx))),
            observer: rx,
        }
    }

    /// Raise the signal. Idempotent: only the first call has any effect.
    pub fn cancel(&self) {
        if !self.raised.swap(true, Ordering::SeqCst) {
            // Nothing is ever sent on this channel; dropping the sole sender
            // is the broadcast.
            self.keeper.lock().take();
        }
    }

    /// Non-blocking check, safe from any thread.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// Channel view for `select!` arms: receiving completes (with a
    /// disconnect error) once the token is raised, and blocks before that.
    #[must_use]
    pub fn observe(&self) -> &channel::Receiver<()> {
        &self.observer
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
