#![forbid(unsafe_code)]

//! duscan — concurrent disk-usage scanner.
//!
//! Traverses one or more directory trees in parallel and reports the total
//! file count and byte size. Three properties the engine guarantees:
//!
//! 1. **Bounded read concurrency** — a counting gate caps how many directory
//!    reads are in flight at once, no matter how wide the tree fans out
//! 2. **Exact totals** — partial directory listings are still counted, and
//!    traversal errors never abort sibling subtrees
//! 3. **Clean cancellation** — one keystroke (or SIGINT) drains the pipeline
//!    to quiescence in bounded time; no task is left blocked
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use duscan::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use duscan::scan::walker::{ScanConfig, Traversal};
//! use duscan::scan::cancel::CancelToken;
//! ```

pub mod prelude;

pub mod core;
pub mod scan;
