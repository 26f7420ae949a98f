//! Usage-ranked favorites.
//!
//! Counts are keyed by emoji but deliberately not tied to the record store:
//! they survive a dataset replacement, and a favorite whose emoji has gone
//! is simply never returned.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::EmojiRow;
use emojidb_extract::models::Emoji;
use exn::ResultExt;
use sqlx::SqlitePool;

#[derive(Debug, Clone)]
pub struct Favorites {
    pool: SqlitePool,
}
impl From<&Database> for Favorites {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl Favorites {
    /// Add one use of `unicode`, returning the new count.
    ///
    /// The read-modify-write is a single upsert statement, so concurrent
    /// increments are never lost.
    pub async fn increment(&self, unicode: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(include_str!("../queries/increment_favorite.sql"))
            .bind(unicode)
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        u64::try_from(count).or_raise(|| ErrorKind::InvalidData("count"))
    }

    /// How often `unicode` has been used; `0` if never.
    pub async fn count(&self, unicode: &str) -> Result<u64> {
        let count: Option<i64> = sqlx::query_scalar(include_str!("../queries/get_favorite_count.sql"))
            .bind(unicode)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        u64::try_from(count.unwrap_or_default()).or_raise(|| ErrorKind::InvalidData("count"))
    }

    /// The `n` most used emoji that are still in the record store, most used
    /// first. Equal counts are ordered by descending key.
    pub async fn top(&self, n: u32) -> Result<Vec<Emoji>> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let rows: Vec<EmojiRow> = sqlx::query_as(include_str!("../queries/list_top_favorites.sql"))
            .bind(i64::from(n))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Emoji::try_from).collect()
    }
}
