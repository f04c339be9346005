//! Global error handling for batchview
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::clipboard::ClipboardError;

/// Global error type for batchview operations
#[derive(Error, Debug)]
pub enum BatchViewError {
    /// Nothing was selected, neither explicitly nor by the host
    #[error("No files or directories selected")]
    NoSelection,

    /// Tree rendering was asked to render zero entries
    #[error("No entries to render a tree from")]
    EmptyTreeInput,

    /// A single file could not be read as text
    #[error("Failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A directory could not be listed
    #[error("Failed to list {}: {source}", path.display())]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A directory is its own ancestor (usually through a symlink)
    #[error("Directory cycle detected at {}", .0.display())]
    CyclicDirectory(PathBuf),

    /// A directory is nested deeper than the configured limit
    #[error("Directory {} exceeds the maximum depth of {limit}", path.display())]
    DepthLimitExceeded { path: PathBuf, limit: usize },

    /// Clipboard errors
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unexpected error
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Specialized Result type for batchview operations
pub type Result<T> = std::result::Result<T, BatchViewError>;

/// Creates a BatchViewError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::BatchViewError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for adding context to errors
pub trait ResultExt<T, E> {
    /// Add additional context to an error
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E: std::error::Error + 'static> ResultExt<T, E> for std::result::Result<T, E> {
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|e| {
            let context = f();
            BatchViewError::Unexpected(format!("{}: {}", context, e))
        })
    }
}
