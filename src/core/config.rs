//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::errors::{DusError, Result};

/// Default number of concurrent directory reads admitted by the gate.
pub const DEFAULT_READ_CONCURRENCY: usize = 20;

/// Default interval between verbose progress lines.
pub const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 500;

/// Full duscan configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
#[derive(Default)]
pub struct Config {
    pub scan: ScanSection,
    pub progress: ProgressSection,
    pub display: DisplaySection,
}

/// Traversal knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScanSection {
    /// Cap on concurrently open directory reads.
    pub read_concurrency: usize,
    /// Worker threads pulling directories off the work queue.
    /// 0 means "use available parallelism".
    pub workers: usize,
}

/// Progress reporting knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProgressSection {
    pub interval_ms: u64,
}

/// Display-only knobs; never affect computed totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplaySection {
    /// Default size unit: "kib", "mib", or "gib".
    pub unit: String,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            read_concurrency: DEFAULT_READ_CONCURRENCY,
            workers: 0,
        }
    }
}

impl Default for ProgressSection {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_PROGRESS_INTERVAL_MS,
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            unit: "mib".to_string(),
        }
    }
}

impl Config {
    /// Load config from an explicit path, then apply env overrides.
    ///
    /// With no path, defaults are used (duscan has no mandatory config file).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) if p.exists() => {
                let raw = fs::read_to_string(p).map_err(|source| DusError::io(p, source))?;
                toml::from_str::<Self>(&raw)?
            }
            Some(p) => {
                return Err(DusError::MissingConfig {
                    path: p.to_path_buf(),
                });
            }
            None => Self::default(),
        };

        cfg.apply_env_overrides()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Effective worker-thread count after resolving the "0 = auto" sentinel.
    #[must_use]
    pub fn effective_workers(&self) -> usize {
        if self.scan.workers > 0 {
            return self.scan.workers;
        }
        std::thread::available_parallelism().map_or(4, |n| n.get())
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        set_env_usize("DUSCAN_READ_CONCURRENCY", &mut self.scan.read_concurrency)?;
        set_env_usize("DUSCAN_WORKERS", &mut self.scan.workers)?;
        set_env_u64("DUSCAN_PROGRESS_INTERVAL_MS", &mut self.progress.interval_ms)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.scan.read_concurrency == 0 {
            return Err(DusError::InvalidConfig {
                details: "scan.read_concurrency must be at least 1".to_string(),
            });
        }
        if self.progress.interval_ms == 0 {
            return Err(DusError::InvalidConfig {
                details: "progress.interval_ms must be at least 1".to_string(),
            });
        }
        if !matches!(self.display.unit.as_str(), "kib" | "mib" | "gib") {
            return Err(DusError::InvalidConfig {
                details: format!(
                    "display.unit must be one of kib/mib/gib, got {:?}",
                    self.display.unit
                ),
            });
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn set_env_u64(name: &str, slot: &mut u64) -> Result<()> {
    if let Some(raw) = env_var(name) {
        *slot = raw.parse::<u64>().map_err(|error| DusError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })?;
    }
    Ok(())
}

fn set_env_usize(name: &str, slot: &mut usize) -> Result<()> {
    if let Some(raw) = env_var(name) {
        *slot = raw
            .parse::<usize>()
            .map_err(|error| DusError::ConfigParse {
                context: "env",
                details: format!("{name}={raw:?}: {error}"),
            })?;
    }
    Ok(())
}
