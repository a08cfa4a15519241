//! Error types for Scribe.
//!
//! Library crates use [`ScribeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Scribe operations.
#[derive(Debug, thiserror::Error)]
pub enum ScribeError {
    /// Configuration loading or credential validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error talking to the search or generation service.
    #[error("network error: {0}")]
    Network(String),

    /// Generation service error that escaped the retry layer.
    #[error("generation error: {0}")]
    Generation(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Interactive input could not be read (closed stdin, terminal error).
    #[error("input error: {0}")]
    Input(String),

    /// Data validation error (malformed response, invalid value, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Document export error (primary write or format conversion).
    #[error("export error: {0}")]
    Export(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScribeError>;

impl ScribeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
