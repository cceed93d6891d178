//! Library error types

use std::path::PathBuf;
use thiserror::Error;

/// Configuration mistakes, reported before any extraction runs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("the delimiter pairs must not be empty")]
    EmptyPairs,

    #[error("delimiter pair #{index} has an empty {side} literal")]
    EmptyDelimiter { index: usize, side: &'static str },

    #[error("sentence delimiter #{index} is empty")]
    EmptySentenceDelimiter { index: usize },

    #[error("invalid delimiter pair '{0}', expected OPEN=CLOSE")]
    MalformedPair(String),

    #[error("failed to compile delimiter pattern: {0}")]
    Pattern(String),
}

/// Errors raised while loading configuration or documents
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
