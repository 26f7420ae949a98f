//! Where the emoji payload comes from.
//!
//! The freshness protocol needs two things from a transport: a cheap probe
//! that returns only a version tag, and a full fetch that returns the payload
//! together with whatever tag the transport exposes. Both are expressed by
//! the [`DataSource`] trait. Retries, backoff and HTTP specifics are the
//! implementation's business; this crate only defines the seam and ships the
//! sources that need no network.

pub mod backend;
pub mod error;

pub use crate::backend::{DataSource, Fetched};
use std::sync::Arc;

pub type SourceHandle = Arc<dyn DataSource + Send + Sync>;
