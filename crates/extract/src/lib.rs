//! Emoji payload handling.
//!
//! Everything between "we have a JSON payload" and "we have records the
//! store can index": validating the payload shape, turning entries into
//! [`Emoji`](models::Emoji) records with derived search tokens, splitting
//! free-text queries into tokens, and synthesizing a version tag from the
//! payload itself when the data source can't provide one.
//!
//! All functions here are pure; none of them touch storage or the network.

mod checksum;
mod consts;
pub mod error;
pub mod models;
mod tokens;
mod transform;

pub use crate::checksum::json_checksum;
pub use crate::tokens::{extract_tokens, normalize_tokens, query_tokens};
pub use crate::transform::{transform, validate};
