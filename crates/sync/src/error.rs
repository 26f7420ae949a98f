//! Sync Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. The underlying source or cache
//! error is kept as the child of the raised error.

use derive_more::{Display, Error};

/// A sync error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Probing or downloading from the [data source](emojidb_source::DataSource)
    /// failed. Nothing was written.
    #[display("could not fetch emoji data")]
    Fetch,
    /// The payload has no version tag and could not be checksummed.
    #[display("could not checksum emoji data")]
    Checksum,
    /// Reading the fingerprint or loading the dataset failed. Any partial
    /// load was rolled back.
    #[display("could not update the emoji store")]
    Cache,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The underlying kind is what knows; the caller's retry policy can
        // walk the error tree for it.
        matches!(self, Self::Fetch | Self::Cache)
    }
}
