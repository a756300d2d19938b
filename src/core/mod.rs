//! Core types: errors, configuration, display units.

pub mod config;
pub mod errors;
pub mod units;
