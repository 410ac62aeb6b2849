//! Error types for docpress.
//!
//! Library crates use [`DocpressError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all docpress operations.
#[derive(Debug, thiserror::Error)]
pub enum DocpressError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The source .docx could not be opened or its XML is structurally invalid.
    ///
    /// This is the only fatal input error: malformed *content* degrades
    /// gracefully, a broken container does not.
    #[error("document error: {message}")]
    Document { message: String },

    /// HTML-to-Markdown conversion error.
    #[error("conversion error: {0}")]
    Conversion(String),

    /// Network/HTTP error while fetching an image.
    #[error("network error: {0}")]
    Network(String),

    /// Serialization error while emitting a data file.
    #[error("serialization error: {0}")]
    Serialize(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocpressError>;

impl DocpressError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a document error from any displayable message.
    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document {
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
