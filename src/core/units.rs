//! Binary size units and final/progress line formatting.
//!
//! Display only — unit selection never changes the computed totals.

use crate::scan::aggregate::ScanTotals;

/// Canonical KiB→bytes multiplier.
pub const BYTES_PER_KIB: u64 = 1024;

/// Canonical MiB→bytes multiplier (1024 * KiB).
pub const BYTES_PER_MIB: u64 = 1024 * BYTES_PER_KIB;

/// Canonical GiB→bytes multiplier (1024 * MiB).
pub const BYTES_PER_GIB: u64 = 1024 * BYTES_PER_MIB;

/// Unit used to render byte totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayUnit {
    /// Kibibytes.
    Kib,
    /// Mebibytes (default).
    #[default]
    Mib,
    /// Gibibytes.
    Gib,
}

impl DisplayUnit {
    /// Parse a config-file unit name ("kib"/"mib"/"gib").
    #[must_use]
    pub fn from_config_name(name: &str) -> Option<Self> {
        match name {
            "kib" => Some(Self::Kib),
            "mib" => Some(Self::Mib),
            "gib" => Some(Self::Gib),
            _ => None,
        }
    }

    /// Human label, e.g. `"MiB"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Kib => "KiB",
            Self::Mib => "MiB",
            Self::Gib => "GiB",
        }
    }

    const fn divisor(self) -> u64 {
        match self {
            Self::Kib => BYTES_PER_KIB,
            Self::Mib => BYTES_PER_MIB,
            Self::Gib => BYTES_PER_GIB,
        }
    }
}

/// Render running totals as one report line, e.g. `"42 files 1.50 MiB"`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_totals(totals: &ScanTotals, unit: DisplayUnit) -> String {
    let size = totals.bytes as f64 / unit.divisor() as f64;
    format!("{} files {size:.2} {}", totals.files, unit.label())
}
