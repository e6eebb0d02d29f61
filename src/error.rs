//! Error types for doctestr

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for doctestr operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for doctestr
///
/// Only module discovery and report writing are fatal; everything that goes
/// wrong while an example executes is recorded in the report instead.
#[derive(Error, Debug)]
pub enum Error {
    /// A requested module could not be resolved against the search roots.
    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    /// The report file could not be written.
    #[error("Failed to write report to {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Other error with custom message.
    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}
