//! Concurrent traversal engine: cancellation, read gate, directory source,
//! worker-pool walker, and the fan-in aggregator.

pub mod aggregate;
pub mod cancel;
pub mod gate;
pub mod source;
pub mod walker;
