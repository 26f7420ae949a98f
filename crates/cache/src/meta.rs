//! Generic key-value store.
//!
//! Values are JSON-encoded, so anything `serde` can round-trip can be stored.
//! The loader keeps the dataset fingerprint here; the rest of the namespace
//! is free for settings.

use crate::Database;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor, SqlitePool};
use std::collections::HashMap;

/// Version tag of the loaded dataset.
pub const KEY_ETAG: &str = "eTag";
/// Identifier of the source the loaded dataset came from.
pub const KEY_URL: &str = "url";
/// Preferred skin tone, `0` (none) to `5`.
pub const KEY_SKIN_TONE: &str = "skinTone";

pub const DEFAULT_SKIN_TONE: u8 = 0;
pub const MAX_SKIN_TONE: u8 = 5;

/// Read the raw (JSON-encoded) values for `keys`, in the same order.
///
/// One statement, so every value comes from the same snapshot.
pub(crate) async fn read_raw<'e, E>(executor: E, keys: &[&str]) -> Result<Vec<Option<String>>>
where
    E: SqliteExecutor<'e>,
{
    if keys.is_empty() {
        return Ok(Vec::new());
    }
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT key, value FROM meta WHERE key IN (");
    let mut separated = query.separated(", ");
    for key in keys {
        separated.push_bind(*key);
    }
    separated.push_unseparated(")");
    let rows: Vec<(String, String)> = query
        .build_query_as()
        .fetch_all(executor)
        .await
        .or_raise(|| ErrorKind::Database)?;
    let mut found: HashMap<String, String> = rows.into_iter().collect();
    Ok(keys.iter().map(|key| found.remove(*key)).collect())
}

/// Upsert a raw (already JSON-encoded) value.
pub(crate) async fn write_raw<'e, E>(executor: E, key: &str, value: &str) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(include_str!("../queries/upsert_meta.sql"))
        .bind(key)
        .bind(value)
        .execute(executor)
        .await
        .or_raise(|| ErrorKind::Database)?;
    Ok(())
}

pub(crate) fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).or_raise(|| ErrorKind::InvalidData("meta value"))
}

pub(crate) fn decode<T: DeserializeOwned>(raw: Option<String>) -> Result<Option<T>> {
    raw.map(|raw| serde_json::from_str(&raw).or_raise(|| ErrorKind::InvalidData("meta value")))
        .transpose()
}

/// Handle to the `meta` namespace.
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    pool: SqlitePool,
}
impl From<&Database> for KeyValueStore {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl KeyValueStore {
    /// Get a single value; `None` if the key was never set.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let raw: Option<(String,)> = sqlx::query_as(include_str!("../queries/get_meta.sql"))
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        decode(raw.map(|(value,)| value))
    }

    /// Get several values of the same type at once.
    ///
    /// The result has the same length and order as `keys`.
    pub async fn get_many<T: DeserializeOwned>(&self, keys: &[&str]) -> Result<Vec<Option<T>>> {
        read_raw(&self.pool, keys).await?.into_iter().map(decode).collect()
    }

    /// Insert or overwrite a value.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        write_raw(&self.pool, key, &encode(value)?).await
    }

    pub async fn get_preferred_skin_tone(&self) -> Result<u8> {
        Ok(self.get(KEY_SKIN_TONE).await?.unwrap_or(DEFAULT_SKIN_TONE))
    }

    /// Returns [`ErrorKind::InvalidData`] if `tone` is above [`MAX_SKIN_TONE`].
    pub async fn set_preferred_skin_tone(&self, tone: u8) -> Result<()> {
        if tone > MAX_SKIN_TONE {
            exn::bail!(ErrorKind::InvalidData("skin tone"));
        }
        self.set(KEY_SKIN_TONE, &tone).await
    }
}
