//! Cache Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A cache error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
/// Lookups that find nothing are not errors; they return `None`.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Any failure inside SQLite or the connection pool, including a
    /// transaction that could not be committed. Whatever the transaction
    /// wrote has been rolled back.
    #[display("database error")]
    Database,
    #[display("database migration error")]
    Migration,
    /// The payload handed to the loader could not be turned into records.
    #[display("invalid emoji data")]
    Transform,
    /// Serialization/deserialization error.
    #[display("invalid cache data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
    /// Removing database files from disk failed.
    #[display("could not delete database files")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // SQLITE_BUSY surfaces as a database error once busy_timeout has
        // elapsed; another writer may have finished by then.
        matches!(self, Self::Database)
    }
}
