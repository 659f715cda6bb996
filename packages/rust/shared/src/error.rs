//! Error types for docsource.
//!
//! Library crates use [`DocSourceError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;
use std::sync::Arc;

/// Top-level error type for all docsource operations.
#[derive(Debug, thiserror::Error)]
pub enum DocSourceError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error during discovery or a content read.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed front matter block.
    #[error("parse error in {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A spawned scan or extraction task failed to complete.
    #[error("task error: {0}")]
    Task(String),

    /// A failure observed by every caller of one memoized scan.
    #[error(transparent)]
    Shared(Arc<DocSourceError>),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocSourceError>;

impl DocSourceError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error for the file at `path`.
    pub fn parse(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
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

    /// Attach a path to a parse error produced without one.
    pub fn at_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::Parse { message, .. } => Self::Parse {
                path: path.into(),
                message,
            },
            other => other,
        }
    }
}
