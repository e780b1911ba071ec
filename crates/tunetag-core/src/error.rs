//! Error types for tunetag

use std::path::PathBuf;

/// Result type alias using tunetag's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for tunetag operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A dataset line that is not a JSON object
    #[error("parse error: {0}")]
    Parse(String),

    /// One side of a record could not be scored
    #[error("scoring error: {0}")]
    Scoring(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// The dataset source could not be opened or read
    #[error("cannot read source {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The destination could not be created or written
    #[error("cannot write destination {path}: {source}")]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML configuration errors
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a new scoring error
    pub fn scoring(msg: impl Into<String>) -> Self {
        Self::Scoring(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Wrap an IO error raised while reading the source
    pub fn source_unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SourceUnreadable {
            path: path.into(),
            source,
        }
    }

    /// Wrap an IO error raised while writing the destination
    pub fn destination_unwritable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DestinationUnwritable {
            path: path.into(),
            source,
        }
    }
}
