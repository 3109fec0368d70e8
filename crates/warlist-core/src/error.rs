//! Error types for the war list core.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience type alias for Results using [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by gathering, validation, and store operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Bad or missing input fields, or a tokenization failure.
    #[error("{0}")]
    Validation(String),

    /// A nickname failed the safety check.
    #[error("invalid nick: {0:?}")]
    InvalidNick(String),

    /// The pre-write backup could not be created.
    #[error("backup of {} failed", .path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store file does not exist.
    #[error("store not found: {}", .0.display())]
    NotFound(PathBuf),

    /// No usable backup is recorded for the store.
    #[error("no backup recorded for {}", .0.display())]
    NoBackup(PathBuf),

    /// I/O failure while reading or appending the text store.
    #[error("store write failed: {}", .path.display())]
    StoreWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// SQLite failure during a query or insert.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The release check failed; informational only.
    #[error("update check failed: {0}")]
    Update(String),

    /// Incidental I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
