//! Error types for snipkit.
//!
//! Library crates use [`SnipkitError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all snipkit operations.
#[derive(Debug, thiserror::Error)]
pub enum SnipkitError {
    /// Malformed or missing manifest, unknown resolver, bad app config.
    #[error("config error: {message}")]
    Config { message: String },

    /// Malformed snippet header, missing attribute, or no usable code blocks.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Version-control history could not be queried. Never fatal: the reader
    /// logs it and falls back to empty metadata.
    #[error("history unavailable: {0}")]
    History(String),

    /// Markdown rendering failed.
    #[error("render error: {0}")]
    Render(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Filesystem I/O error while reading a snippet of a collection.
    #[error("I/O error in [{collection}] at {path:?}: {source}")]
    SnippetIo {
        collection: String,
        path: PathBuf,
        source: std::io::Error,
    },

    /// Structural problem with the content tree (missing collection directory, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SnipkitError>;

impl SnipkitError {
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

    /// Prefix the message with the collection and file it came from.
    ///
    /// I/O errors keep their path (which already names the file) and gain
    /// the collection.
    pub fn in_snippet(self, collection: &str, file: &str) -> Self {
        let ctx = |m: String| format!("[{collection}] {file}: {m}");
        match self {
            Self::Config { message } => Self::Config {
                message: ctx(message),
            },
            Self::Parse { message } => Self::Parse {
                message: ctx(message),
            },
            Self::Validation { message } => Self::Validation {
                message: ctx(message),
            },
            Self::Render(m) => Self::Render(ctx(m)),
            Self::History(m) => Self::History(ctx(m)),
            Self::Io { path, source } => Self::SnippetIo {
                collection: collection.to_string(),
                path,
                source,
            },
            snippet_io @ Self::SnippetIo { .. } => snippet_io,
        }
    }
}
