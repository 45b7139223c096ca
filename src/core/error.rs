//! Error types for the logger

use std::path::Path;

pub type Result<T> = std::result::Result<T, LoggerError>;

/// Errors surfaced to the embedding application.
///
/// Only initialization can fail from the caller's point of view. Sink
/// write, rotation, and retention failures are absorbed and reported on
/// the diagnostic stream so the logger never breaks the program.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// The logger was already initialized in this process
    #[error("logger already initialized")]
    AlreadyInitialized,

    /// Log directory could not be created
    #[error("failed to create log directory '{path}': {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Log file could not be opened
    #[error("failed to open log file '{path}': {source}")]
    OpenFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl LoggerError {
    /// Create a directory creation error
    pub fn create_dir(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        LoggerError::CreateDir {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Create a file open error
    pub fn open_file(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        LoggerError::OpenFile {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
