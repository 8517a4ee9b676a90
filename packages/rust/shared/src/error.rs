//! Error types for quizbook.
//!
//! Library crates use [`QuizbookError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all quizbook operations.
#[derive(Debug, thiserror::Error)]
pub enum QuizbookError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed metadata JSON or front-matter YAML.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Data validation error (bad config value, invalid URL, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A question directory disagrees with the slug its metadata declares.
    #[error("corpus inconsistency: directory {directory:?} declares slug {declared:?}")]
    Consistency { directory: String, declared: String },

    /// Question content whose TL;DR excerpt cannot be used as-is.
    #[error("content structure error in {path:?}: {message}")]
    ContentStructure { path: PathBuf, message: String },

    /// README sentinel markers missing, duplicated, or out of order.
    #[error("sentinel error for {marker}: {message}")]
    Sentinel { marker: String, message: String },

    /// A background load task panicked or was cancelled.
    #[error("task error: {0}")]
    Task(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, QuizbookError>;

impl QuizbookError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
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

    pub fn content_structure(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::ContentStructure {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn sentinel(marker: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Sentinel {
            marker: marker.into(),
            message: msg.into(),
        }
    }
}
