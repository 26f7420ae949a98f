//! Data source trait and implementations.
//!
//! This module defines the [`DataSource`] trait, which provides a unified
//! interface for discovering the current version of the remote dataset and
//! downloading it, across different transports.

mod local;
#[cfg(feature = "mock")]
mod mock;

pub use self::local::LocalSource;
#[cfg(feature = "mock")]
pub use self::mock::MockSource;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// The result of a full fetch: the payload and, if the transport exposes
/// one, its version tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    /// Opaque revision identifier (an HTTP `ETag`, for example).
    pub tag: Option<String>,
    /// The parsed payload body.
    pub payload: Value,
}

/// Unified interface for emoji data sources.
///
/// All operations are asynchronous so that network transports don't block
/// the caller. Implementations must not retry internally unless that is an
/// explicit, documented property of the transport; the freshness checker
/// propagates the first failure it sees.
///
/// # Examples
///
/// ```
/// use emojidb_source::{DataSource, error::Result};
///
/// async fn current_tag(source: &dyn DataSource) -> Result<Option<String>> {
///     match source.probe_version_tag().await? {
///         Some(tag) => Ok(Some(tag)),
///         None => Ok(source.fetch_with_tag().await?.tag),
///     }
/// }
/// ```
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Identifier of the source (typically its URL). Stored alongside the
    /// version tag, so pointing the store at a different source invalidates
    /// the local dataset even if the tags happen to match.
    fn url(&self) -> &str;

    /// Cheaply discover the current version tag without downloading the
    /// payload (an HTTP `HEAD` request, for example).
    ///
    /// Returns `None` when the transport can't expose a tag this way; callers
    /// then fall back to [`fetch_with_tag()`](Self::fetch_with_tag).
    async fn probe_version_tag(&self) -> Result<Option<String>>;

    /// Download the payload, along with its version tag if the transport
    /// exposes one.
    async fn fetch_with_tag(&self) -> Result<Fetched>;
}
