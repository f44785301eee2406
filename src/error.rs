//! Error types
//!
//! Configuration problems surface at construction time; gameplay requests
//! that cannot be honored leave prior state untouched.

use std::path::PathBuf;

use thiserror::Error;

/// Problems found while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid tuning: {0}")]
    Invalid(String),

    #[error("no levels configured")]
    NoLevels,
}

/// Level selection failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("invalid level index {index} (have {count} levels)")]
    InvalidIndex { index: usize, count: usize },
}
