//! SQLite-backed emoji store.
//!
//! This crate holds the local copy of the emoji dataset and everything that
//! is derived from it. The database is a cache: the remote dataset is the
//! source of truth, and if the database is deleted it is rebuilt on the next
//! sync. Favorite counts and settings are the only data that exist nowhere
//! else.
//!
//! # Architecture
//! - [`Loader`] replaces the whole dataset in one write transaction and keeps
//!   its [`Fingerprint`] (source URL and version tag) next to it.
//! - [`Repository`] answers reads: by group, by key, and AND-token search
//!   with prefix matching on the last token.
//! - [`Favorites`] counts how often each emoji is used.
//! - [`KeyValueStore`] is a small JSON key-value namespace for settings.
//!
//! All of them are cheap handles created from a [`Database`].

mod db;
pub mod error;
mod favorites;
mod loader;
pub mod meta;
mod models;
mod repo;
#[cfg(test)]
mod testing;

pub use crate::db::{Database, Settings};
pub use crate::favorites::Favorites;
pub use crate::loader::{Fingerprint, LoadOutcome, Loader};
pub use crate::meta::KeyValueStore;
pub use crate::repo::Repository;
pub use emojidb_extract::models::Emoji;
