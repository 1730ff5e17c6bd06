//! Error types and handling infrastructure for gv-tools.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! library error types. The `gv-view-log` binary layers `anyhow` on top for context.
//!
//! ## Error Classes
//!
//! - **I/O**: seek/read failures on the underlying stream, never retried
//! - **Malformed lines**: a non-blank line whose sort key cannot be extracted
//! - **Configuration and arguments**: problems the user can fix
//!
//! An empty file or a target past the last key is not an error.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for gv-tools operations.
#[derive(Error, Debug)]
pub enum GvError {
    /// File system related errors (seek, read, metadata)
    #[error("File operation failed: {message}")]
    FileError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// File not found specifically (common case for user feedback)
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Path exists but is not a regular file
    #[error("Path is not a regular file: {path}")]
    NotAFile { path: PathBuf },

    /// Path exists but is not a directory
    #[error("\"{path}\" is not a directory.")]
    NotADirectory { path: PathBuf },

    /// Permission denied accessing file
    #[error("Permission denied accessing file: {path}")]
    PermissionDenied { path: PathBuf },

    /// A non-blank line whose key could not be extracted.
    ///
    /// The sortedness of the file can no longer be trusted, so no boundary is returned.
    #[error("Malformed line at byte {offset}: {reason}: {line:?}")]
    MalformedLine {
        offset: u64,
        line: String,
        reason: String,
    },

    /// A line could not be decoded with the requested encoding
    #[error("Line at byte {offset} is not valid {encoding}")]
    DecodeError {
        offset: u64,
        encoding: &'static str,
    },

    /// Configuration file errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Invalid command line arguments
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The user backed out of an interactive prompt
    #[error("Cancelled")]
    Cancelled,

    /// The reader of our output went away, e.g. the pager was quit early
    #[error("Output closed")]
    OutputClosed,

    /// Generic error for cases not covered by specific variants
    #[error("{message}")]
    Other { message: String },
}

/// Standard Result type for gv-tools operations.
pub type Result<T> = std::result::Result<T, GvError>;

impl GvError {
    /// Create a FileError from an io::Error with additional context
    pub fn file_error(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileError {
            message: message.into(),
            source,
        }
    }

    /// Map an error from opening `path` to the most specific variant
    pub fn open_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::FileError {
                message: format!("Failed to open file: {}", path.display()),
                source,
            },
        }
    }

    /// Create a MalformedLine error for the line starting at `offset`
    pub fn malformed_line(offset: u64, line: &str, reason: impl Into<String>) -> Self {
        Self::MalformedLine {
            offset,
            line: line.trim_end_matches(['\r', '\n']).to_string(),
            reason: reason.into(),
        }
    }

    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an InvalidArgument error with a descriptive message
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a generic Other error with a descriptive message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

// Automatic conversion from io::Error to GvError
impl From<std::io::Error> for GvError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            // The path is unknown here; call sites that have one use open_error()
            std::io::ErrorKind::NotFound => Self::FileError {
                message: "File not found".to_string(),
                source: err,
            },
            std::io::ErrorKind::PermissionDenied => Self::FileError {
                message: "Permission denied".to_string(),
                source: err,
            },
            _ => Self::FileError {
                message: "IO operation failed".to_string(),
                source: err,
            },
        }
    }
}
