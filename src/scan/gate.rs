//! Counting admission gate bounding concurrent directory reads.
//!
//! A bounded channel of unit tokens acts as the semaphore: acquiring a slot
//! pushes a token, releasing pops one. Acquisition races a send against the
//! cancellation observer in a `select!`, so a blocked caller wakes the
//! moment the scan is cancelled and never consumes a slot on that path.

use crossbeam_channel as channel;
use crossbeam_channel::select;

use crate::scan::cancel::CancelToken;

/// Outcome of [`ReadGate::acquire`].
pub enum GateAdmission {
    /// A slot was obtained; holds until the permit drops.
    Admitted(GatePermit),
    /// Cancellation was observed before a slot freed up.
    Aborted,
}

/// RAII slot holder. Dropping it releases the slot unconditionally.
pub struct GatePermit {
    slots: channel::Receiver<()>,
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        // A token was pushed when this permit was created, so the channel is
        // non-empty until every outstanding permit has released one.
        let _ = self.slots.try_recv();
    }
}

/// Fixed-capacity admission control for the directory-read step.
///
/// Invariant: at most `capacity` outstanding permits at any instant.
#[derive(Clone)]
pub struct ReadGate {
    slots_tx: channel::Sender<()>,
    slots_rx: channel::Receiver<()>,
    capacity: usize,
}

impl ReadGate {
    /// Create a gate admitting up to `capacity` concurrent reads.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (slots_tx, slots_rx) = channel::bounded::<()>(capacity);
        Self {
            slots_tx,
            slots_rx,
            capacity,
        }
    }

    /// Configured capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Block until a slot frees up or the scan is cancelled, whichever
    /// happens first. After an `Aborted` return the caller must perform no
    /// gated work.
    #[must_use]
    pub fn acquire(&self, cancel: &CancelToken) -> GateAdmission {
        // Level-triggered: a signal raised before we got here wins outright,
        // even if a slot is also free.
        if cancel.is_cancelled() {
            return GateAdmission::Aborted;
        }
        select! {
            send(self.slots_tx, ()) -> res => {
                if res.is_err() {
                    // All receivers gone; the gate is being torn down.
                    return GateAdmission::Aborted;
                }
                GateAdmission::Admitted(GatePermit {
                    slots: self.slots_rx.clone(),
                })
            }
            recv(cancel.observe()) -> _ => GateAdmission::Aborted,
        }
    }
}
