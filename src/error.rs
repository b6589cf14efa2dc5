//! Error types for generation and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a generation run before any cell is produced.
#[derive(Debug, Error, PartialEq)]
pub enum GenerationError {
    #[error("world dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid generation parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Errors raised while reading a generation context from disk or the CLI.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown biome `{0}`")]
    UnknownBiome(String),

    #[error(transparent)]
    Invalid(#[from] GenerationError),
}
