//! Error types for the exhibit core
//!
//! Decode failures are recoverable and stay local to a single load cycle.
//! Configuration failures are reported up front, before any navigation happens.

use thiserror::Error;

/// Failure to turn a locator into a scene object.
///
/// `Clone` because one decode result is handed to every caller that was
/// waiting on the same locator.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DecodeError {
    #[error("failed to read asset '{locator}': {message}")]
    Io { locator: String, message: String },

    #[error("malformed asset '{locator}': {message}")]
    Malformed { locator: String, message: String },

    #[error("unsupported asset format '{extension}' for '{locator}'")]
    UnsupportedFormat { locator: String, extension: String },

    #[error("asset '{locator}' contains no geometry")]
    Empty { locator: String },

    #[error("decode of '{locator}' was interrupted")]
    Interrupted { locator: String },
}

impl DecodeError {
    /// Locator the failure belongs to
    pub fn locator(&self) -> &str {
        match self {
            DecodeError::Io { locator, .. }
            | DecodeError::Malformed { locator, .. }
            | DecodeError::UnsupportedFormat { locator, .. }
            | DecodeError::Empty { locator }
            | DecodeError::Interrupted { locator } => locator,
        }
    }
}

/// Invalid gallery configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("gallery has no modes")]
    NoModes,

    #[error("mode '{0}' has no items")]
    EmptyMode(String),

    #[error("mode '{0}' is defined more than once")]
    DuplicateMode(String),

    #[error("item {index} of mode '{mode}' has an empty locator")]
    EmptyLocator { mode: String, index: usize },
}

/// Errors surfaced by the gallery controller.
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("unknown gallery mode '{0}'")]
    UnknownMode(String),
}
