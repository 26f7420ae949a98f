//! Transactional bulk replacement of the emoji dataset.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::meta::{self, KEY_ETAG, KEY_URL};
use crate::models::EmojiRow;
use emojidb_extract::transform;
use exn::ResultExt;
use serde_json::Value;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::instrument;

/// Identity of the loaded dataset: where it came from and which version it
/// is. The local copy is current iff both match the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    pub url: String,
    pub tag: String,
}
impl Fingerprint {
    pub fn matches(&self, url: &str, tag: &str) -> bool {
        self.url == url && self.tag == tag
    }
}

/// Result of [`Loader::load()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Someone else already loaded this exact dataset; nothing was written.
    AlreadyCurrent,
    /// The previous dataset was replaced.
    Replaced { removed: usize, inserted: usize },
}

async fn read_fingerprint(conn: &mut SqliteConnection) -> Result<Option<Fingerprint>> {
    let mut values = meta::read_raw(&mut *conn, &[KEY_ETAG, KEY_URL]).await?.into_iter();
    let tag: Option<String> = meta::decode(values.next().flatten())?;
    let url: Option<String> = meta::decode(values.next().flatten())?;
    Ok(tag.zip(url).map(|(tag, url)| Fingerprint { url, tag }))
}

/// Writes whole datasets into the store.
///
/// A load replaces every record and the fingerprint in one write
/// transaction: readers see either the old dataset or the new one, never a
/// mix, and a failure anywhere leaves the old dataset untouched.
#[derive(Debug, Clone)]
pub struct Loader {
    pool: SqlitePool,
}
impl From<&Database> for Loader {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl Loader {
    /// The fingerprint of the loaded dataset, if any.
    pub async fn fingerprint(&self) -> Result<Option<Fingerprint>> {
        let mut conn = self.pool.acquire().await.or_raise(|| ErrorKind::Database)?;
        read_fingerprint(&mut conn).await
    }

    /// `true` until a dataset has been loaded.
    pub async fn is_empty(&self) -> Result<bool> {
        let url: Option<String> = meta::decode(meta::read_raw(&self.pool, &[KEY_URL]).await?.pop().flatten())?;
        Ok(url.is_none())
    }

    /// Whether the loaded dataset came from `url` at version `tag`.
    pub async fn has_data(&self, url: &str, tag: &str) -> Result<bool> {
        Ok(self.fingerprint().await?.is_some_and(|f| f.matches(url, tag)))
    }

    /// Replace the stored dataset with `payload`, recording `(url, tag)` as
    /// its fingerprint.
    ///
    /// The payload is transformed before the database is touched. The write
    /// transaction is opened with `BEGIN IMMEDIATE`, so concurrent loaders
    /// (in this process or another one sharing the file) queue up on the
    /// write lock. Once it holds the lock, the loader re-reads the
    /// fingerprint: if an earlier loader already stored this exact version,
    /// nothing is written and [`LoadOutcome::AlreadyCurrent`] is returned.
    #[instrument(skip(self, payload))]
    pub async fn load(&self, payload: &Value, url: &str, tag: &str) -> Result<LoadOutcome> {
        let emojis = transform(payload).or_raise(|| ErrorKind::Transform)?;
        let rows = emojis.iter().map(EmojiRow::try_from).collect::<Result<Vec<_>>>()?;

        let mut tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .or_raise(|| ErrorKind::Database)?;
        let current = read_fingerprint(&mut tx).await?;
        let old_keys: Vec<String> = sqlx::query_scalar(include_str!("../queries/list_all_keys.sql"))
            .fetch_all(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        if current.is_some_and(|f| f.matches(url, tag)) {
            tx.rollback().await.or_raise(|| ErrorKind::Database)?;
            tracing::info!(url, tag, "Dataset already current, skipping load");
            return Ok(LoadOutcome::AlreadyCurrent);
        }

        for key in &old_keys {
            sqlx::query(include_str!("../queries/delete_emoji.sql"))
                .bind(key)
                .execute(&mut *tx)
                .await
                .or_raise(|| ErrorKind::Database)?;
        }
        for (emoji, row) in emojis.iter().zip(rows) {
            sqlx::query(include_str!("../queries/insert_emoji.sql"))
                .bind(&row.unicode)
                .bind(row.annotation)
                .bind(row.group_id)
                .bind(row.sort_order)
                .bind(row.shortcodes)
                .bind(row.tags)
                .bind(row.tokens)
                .bind(row.emoticon)
                .bind(row.version)
                .bind(row.extra)
                .execute(&mut *tx)
                .await
                .or_raise(|| ErrorKind::Database)?;
            if emoji.tokens.is_empty() {
                continue;
            }
            let mut index: QueryBuilder<Sqlite> = QueryBuilder::new("INSERT INTO emoji_tokens (token, unicode) ");
            index.push_values(&emoji.tokens, |mut b, token| {
                b.push_bind(token).push_bind(&row.unicode);
            });
            index.build().execute(&mut *tx).await.or_raise(|| ErrorKind::Database)?;
        }
        meta::write_raw(&mut *tx, KEY_ETAG, &meta::encode(tag)?).await?;
        meta::write_raw(&mut *tx, KEY_URL, &meta::encode(url)?).await?;
        tx.commit().await.or_raise(|| ErrorKind::Database)?;

        let outcome = LoadOutcome::Replaced {
            removed: old_keys.len(),
            inserted: emojis.len(),
        };
        tracing::info!(url, tag, removed = old_keys.len(), inserted = emojis.len(), "Loaded emoji dataset");
        Ok(outcome)
    }
}
