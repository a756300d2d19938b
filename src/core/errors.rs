//! DUS-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, DusError>;

/// Top-level error type for duscan.
///
/// Only argument and configuration errors abort a run; everything the
/// traversal hits mid-scan travels the diagnostics channel instead.
#[derive(Debug, Error)]
pub enum DusError {
    #[error("[DUS-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[DUS-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[DUS-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[DUS-2001] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[DUS-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[DUS-3003] channel closed in component {component}")]
    ChannelClosed { component: &'static str },
}

impl DusError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "DUS-1001",
            Self::MissingConfig { .. } => "DUS-1002",
            Self::ConfigParse { .. } => "DUS-1003",
            Self::Serialization { .. } => "DUS-2001",
            Self::Io { .. } => "DUS-3002",
            Self::ChannelClosed { .. } => "DUS-3003",
        }
    }

    /// Whether the error is fatal before any traversal starts.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. } | Self::MissingConfig { .. } | Self::ConfigParse { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for DusError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for DusError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
