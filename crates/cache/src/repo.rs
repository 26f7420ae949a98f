//! Indexed emoji record store.
//!
//! Reads go through two indexes: the unique `(group_id, sort_order)` index
//! for range scans by group, and the multi-entry `emoji_tokens` index for
//! search. Records are only ever written by the [`Loader`](crate::Loader).

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::EmojiRow;
use emojidb_extract::query_tokens;
use emojidb_extract::models::Emoji;
use exn::ResultExt;
use sqlx::SqlitePool;
use std::collections::HashSet;
use tracing::instrument;

fn into_models(rows: Vec<EmojiRow>) -> Result<Vec<Emoji>> {
    rows.into_iter().map(Emoji::try_from).collect()
}

/// Exclusive upper bound for a prefix range scan: every string starting with
/// `prefix` sorts before it.
fn prefix_upper_bound(prefix: &str) -> String {
    format!("{prefix}{}", char::MAX)
}

/// Keep the rows that appear (by key) in every list.
///
/// The shortest list is the probe set, so the work is bounded by the most
/// selective token.
fn intersect(mut lists: Vec<Vec<EmojiRow>>) -> Vec<EmojiRow> {
    let Some(shortest) = lists.iter().enumerate().min_by_key(|(_, rows)| rows.len()).map(|(i, _)| i) else {
        return Vec::new();
    };
    let probes = lists.swap_remove(shortest);
    let others: Vec<HashSet<&str>> = lists
        .iter()
        .map(|rows| rows.iter().map(|row| row.unicode.as_str()).collect())
        .collect();
    probes
        .into_iter()
        .filter(|row| others.iter().all(|keys| keys.contains(row.unicode.as_str())))
        .collect()
}

/// Repository for querying emoji records.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl Repository {
    /// All records in `group`, ascending by order.
    ///
    /// This is a range scan over `[(group, 0), (group + 1, 0))`, so records
    /// of neighbouring groups are never included.
    pub async fn get_by_group(&self, group: u32) -> Result<Vec<Emoji>> {
        let rows: Vec<EmojiRow> = sqlx::query_as(include_str!("../queries/get_by_group.sql"))
            .bind(i64::from(group))
            .bind(i64::from(group) + 1)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        into_models(rows)
    }

    /// Point lookup by primary key.
    pub async fn get_by_unicode(&self, unicode: &str) -> Result<Option<Emoji>> {
        let row: Option<EmojiRow> = sqlx::query_as(include_str!("../queries/get_by_unicode.sql"))
            .bind(unicode)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(Emoji::try_from).transpose()
    }

    /// Records matching every token, ascending by order (ties by key).
    ///
    /// All tokens but the last must match a stored token exactly; the last
    /// one is a prefix, so a query can be searched while it's still being
    /// typed. Every per-token lookup runs inside one read transaction and all
    /// of them complete before the results are intersected, so the answer
    /// reflects a single snapshot of the store.
    #[instrument(skip(self, tokens), fields(tokens = tokens.len()))]
    pub async fn search_by_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<Emoji>> {
        let Some(last) = tokens.len().checked_sub(1) else {
            return Ok(Vec::new());
        };
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
        let mut lists = Vec::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            let token = token.as_ref();
            let query = if i == last {
                sqlx::query_as(include_str!("../queries/search_token_prefix.sql"))
                    .bind(token)
                    .bind(prefix_upper_bound(token))
            } else {
                sqlx::query_as(include_str!("../queries/search_token_exact.sql")).bind(token)
            };
            let rows: Vec<EmojiRow> = query.fetch_all(&mut *tx).await.or_raise(|| ErrorKind::Database)?;
            lists.push(rows);
        }
        tx.commit().await.or_raise(|| ErrorKind::Database)?;
        let mut results = into_models(intersect(lists))?;
        results.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.unicode.cmp(&b.unicode)));
        tracing::debug!(results = results.len(), "Searched token index");
        Ok(results)
    }

    /// Free-text search: the query is split into tokens, then searched with
    /// [`search_by_tokens()`](Self::search_by_tokens). Words too short to be
    /// indexed only count when they're the last one.
    pub async fn search_by_query(&self, query: &str) -> Result<Vec<Emoji>> {
        self.search_by_tokens(&query_tokens(query.trim())).await
    }

    /// The first search result that has `shortcode` among its shortcodes,
    /// compared case-insensitively.
    pub async fn search_by_shortcode(&self, shortcode: &str) -> Result<Option<Emoji>> {
        let candidates = self.search_by_query(shortcode).await?;
        let shortcode = shortcode.trim();
        Ok(candidates.into_iter().find(|emoji| emoji.has_shortcode(shortcode)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{keys, loaded_db, payload};
    use emojidb_extract::models::Emoticon;
    use rstest::rstest;
    use serde_json::json;

    #[tokio::test]
    async fn test_round_trip() {
        let db = loaded_db().await;
        let repo = Repository::from(&db);
        let expected = emojidb_extract::transform(&payload()).unwrap();
        assert_eq!(expected.len(), 8);
        for emoji in expected {
            let stored = repo.get_by_unicode(&emoji.unicode).await.unwrap();
            assert_eq!(stored.as_ref(), Some(&emoji), "{}", emoji.unicode);
        }
        let grinning = repo.get_by_unicode("😀").await.unwrap().unwrap();
        assert_eq!(grinning.tokens, vec![":d", "face", "grin", "grinning"]);
        assert_eq!(grinning.emoticon, Some(Emoticon::One(":D".to_string())));
        let grapes = repo.get_by_unicode("🍇").await.unwrap().unwrap();
        assert_eq!(grapes.emoticon, None);
    }

    #[tokio::test]
    async fn test_get_by_unicode_missing() {
        let db = loaded_db().await;
        assert_eq!(Repository::from(&db).get_by_unicode("🦀").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_extra_fields_survive_storage() {
        let db = loaded_db().await;
        let emoji = Repository::from(&db).get_by_unicode("👍").await.unwrap().unwrap();
        assert_eq!(emoji.extra.get("skins"), Some(&json!([{"tone": 1, "emoji": "👍🏻", "version": 1}])));
    }

    #[rstest]
    #[case(0, &["😀", "😃", "😂"])]
    #[case(1, &["👍"])]
    #[case(2, &[])]
    #[case(3, &["🍇", "🍈"])]
    #[case(4, &["🍉"])]
    #[case(5, &["🦖"])]
    #[tokio::test]
    async fn test_get_by_group_is_isolated(#[case] group: u32, #[case] expected: &[&str]) {
        let db = loaded_db().await;
        let emojis = Repository::from(&db).get_by_group(group).await.unwrap();
        assert_eq!(keys(&emojis), expected);
    }

    #[rstest]
    #[case(&["face", "gr"], &["😀", "😃"])]
    #[case(&["face", "joy"], &["😂"])]
    #[case(&["gra"], &["🍇"])]
    #[case(&["fr"], &["🍇", "🍉", "🍈"])]
    #[case(&["fruit", "melon"], &["🍈"])]
    #[case(&["grin", "face"], &["😀"])]
    #[case(&["gr", "face"], &[])]
    #[case(&["+1"], &["👍"])]
    #[case(&[":)"], &["😃"])]
    #[case(&["nothing"], &[])]
    #[tokio::test]
    async fn test_search_by_tokens(#[case] tokens: &[&str], #[case] expected: &[&str]) {
        let db = loaded_db().await;
        let emojis = Repository::from(&db).search_by_tokens(tokens).await.unwrap();
        assert_eq!(keys(&emojis), expected);
    }

    #[tokio::test]
    async fn test_search_without_tokens_is_empty() {
        let db = loaded_db().await;
        let repo = Repository::from(&db);
        assert!(repo.search_by_tokens::<&str>(&[]).await.unwrap().is_empty());
        assert!(repo.search_by_query("   ").await.unwrap().is_empty());
    }

    #[rstest]
    #[case("Grinning Face", &["😀", "😃"])]
    #[case("tears of j", &["😂"])]
    #[case("thumbs_up", &["👍"])]
    #[case("t rex", &["🦖"])]
    #[case("T-Re", &["🦖"])]
    #[case("a grapes", &["🍇"])]
    #[case("grinning f", &["😀", "😃"])]
    #[tokio::test]
    async fn test_search_by_query(#[case] query: &str, #[case] expected: &[&str]) {
        let db = loaded_db().await;
        let emojis = Repository::from(&db).search_by_query(query).await.unwrap();
        assert_eq!(keys(&emojis), expected);
    }

    #[rstest]
    #[case("grinning", Some("😀"))]
    #[case("GRINNING_FACE", Some("😀"))]
    #[case("smiley", Some("😃"))]
    #[case("+1", Some("👍"))]
    #[case("t_rex", Some("🦖"))]
    #[case("T_REX", Some("🦖"))]
    #[case("grin", None)]
    #[case("unknown", None)]
    #[tokio::test]
    async fn test_search_by_shortcode(#[case] shortcode: &str, #[case] expected: Option<&str>) {
        let db = loaded_db().await;
        let emoji = Repository::from(&db).search_by_shortcode(shortcode).await.unwrap();
        assert_eq!(emoji.as_ref().map(|e| e.unicode.as_str()), expected);
    }

    #[test]
    fn test_prefix_upper_bound_sorts_after_extensions() {
        let bound = prefix_upper_bound("gr");
        assert!("grinning" < bound.as_str());
        assert!("gr" < bound.as_str());
        assert!("gs" > bound.as_str());
    }
}
