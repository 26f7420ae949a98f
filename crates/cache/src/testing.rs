//! Shared fixtures for the store tests.

use crate::{Database, Loader};
use emojidb_extract::models::Emoji;
use serde_json::{Value, json};

pub(crate) const URL: &str = "mock://emoji/en.json";

pub(crate) fn payload() -> Value {
    json!([
        {
            "annotation": "grinning face",
            "emoji": "😀",
            "group": 0,
            "order": 1,
            "shortcodes": ["grinning_face", "grinning"],
            "tags": ["face", "grin"],
            "emoticon": ":D",
            "version": 1,
        },
        {
            "annotation": "grinning face with big eyes",
            "emoji": "😃",
            "group": 0,
            "order": 2,
            "shortcodes": ["smiley"],
            "tags": ["face", "mouth", "open", "smile"],
            "emoticon": ":)",
            "version": 0.6,
        },
        {
            "annotation": "face with tears of joy",
            "emoji": "😂",
            "group": 0,
            "order": 5,
            "shortcodes": ["joy"],
            "tags": ["face", "joy", "laugh", "tear"],
            "version": 0.6,
        },
        {
            "annotation": "thumbs up",
            "emoji": "👍",
            "group": 1,
            "order": 10,
            "shortcodes": ["+1", "thumbsup"],
            "tags": ["+1", "hand", "thumb", "up"],
            "skins": [{"tone": 1, "emoji": "👍🏻", "version": 1}],
        },
        {
            "annotation": "grapes",
            "emoji": "🍇",
            "group": 3,
            "order": 0,
            "shortcodes": ["grapes"],
            "tags": ["fruit", "grape"],
        },
        {
            "annotation": "melon",
            "emoji": "🍈",
            "group": 3,
            "order": 1,
            "shortcodes": ["melon"],
            "tags": ["fruit", "melon"],
        },
        {
            "annotation": "watermelon",
            "emoji": "🍉",
            "group": 4,
            "order": 0,
            "shortcodes": ["watermelon"],
            "tags": ["fruit", "watermelon"],
        },
        {
            "annotation": "T-Rex",
            "emoji": "🦖",
            "group": 5,
            "order": 0,
            "shortcodes": ["t_rex"],
            "tags": ["t-rex", "tyrannosaurus"],
        },
    ])
}

/// In-memory database with [`payload()`] loaded under tag `v1`.
pub(crate) async fn loaded_db() -> Database {
    let db = Database::connect_in_memory().await.unwrap();
    Loader::from(&db).load(&payload(), URL, "v1").await.unwrap();
    db
}

pub(crate) fn keys(emojis: &[Emoji]) -> Vec<&str> {
    emojis.iter().map(|e| e.unicode.as_str()).collect()
}
