//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use duscan::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{DusError, Result};
pub use crate::core::units::DisplayUnit;

// Scan engine
pub use crate::scan::aggregate::{ScanOutcome, ScanTotals, Termination, aggregate};
pub use crate::scan::cancel::CancelToken;
pub use crate::scan::gate::{GateAdmission, ReadGate};
pub use crate::scan::source::{DirListing, DirectorySource, EntryInfo, FsSource};
pub use crate::scan::walker::{Diagnostic, ScanConfig, Traversal};
