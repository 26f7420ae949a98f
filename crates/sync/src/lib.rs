//! Freshness synchronization between a [`DataSource`](emojidb_source::DataSource)
//! and the local emoji store.
//!
//! The checker asks the source for the cheapest available version tag,
//! compares it with the fingerprint of the loaded dataset, and only downloads
//! and loads when they differ. Retrying failed checks is up to the caller.

pub mod error;
mod freshness;

pub use crate::freshness::{Outcome, check_for_updates, load_first_time};
