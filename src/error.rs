//! Global error handling for repo2tree
//!
//! This module provides a centralized error type for every fatal condition
//! the pipeline can hit. Minification failures are not part of it: they are
//! recovered inside the minify module and never reach the caller.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::clipboard::ClipboardError;

/// Global error type for repo2tree operations
#[derive(Error, Debug)]
pub enum Repo2TreeError {
    /// Malformed `.repo2treerc` or invalid run configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A directory could not be listed or a file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    FilesystemRead {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Chunk size rounds down to zero Base64 groups
    #[error("Invalid line length {chunk_size}: must be at least 4 to hold one Base64 group")]
    EncodingDegenerate {
        /// Requested chunk size
        chunk_size: usize,
    },

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Clipboard errors
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// Output sink errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Repo2TreeError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FilesystemRead {
            path: path.into(),
            source,
        }
    }
}

/// Specialized Result type for repo2tree operations
pub type Result<T> = std::result::Result<T, Repo2TreeError>;

/// Creates a Repo2TreeError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::Repo2TreeError::$error_type(format!($($arg)*))
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
