//! Extraction Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The payload is not a JSON array of emoji entries.
    #[display("emoji data is in the wrong format")]
    WrongFormat,
    /// The payload is a valid array, but contains no entries.
    #[display("emoji data is empty")]
    Empty,
    /// An entry could not be decoded into an emoji.
    #[display("invalid emoji entry at index {index}: {reason}")]
    InvalidEntry {
        /// Position of the offending entry within the payload array.
        index: usize,
        /// Decoder message.
        reason: String,
    },
    /// Two entries share a primary key or a `(group, order)` position.
    #[display("duplicate {field} in emoji data: {value}")]
    Duplicate {
        field: &'static str,
        value: String,
    },
    /// The payload could not be serialized for checksumming.
    #[display("could not serialize emoji data")]
    Serialize,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The payload is either well-formed or it isn't; fetching it again
        // is the caller's decision, not ours.
        false
    }
}
