use serde_json::{Map, Value};

use super::{EmojiData, Emoticon};
use crate::tokens::{extract_tokens, normalize_tokens};

/// An emoji record, as held by the indexed store.
///
/// The primary key is `unicode`. `(group, order)` is unique across the store
/// and defines the display order inside a group. `tokens` is derived from the
/// text fields and is what the token index is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Emoji {
    pub unicode: String,
    pub annotation: String,
    pub group: u32,
    pub order: u32,
    pub shortcodes: Vec<String>,
    pub tags: Vec<String>,
    pub emoticon: Option<Emoticon>,
    pub version: Option<f64>,
    /// Sorted, de-duplicated, lowercased search tokens.
    pub tokens: Vec<String>,
    /// Every payload field not named above, untouched.
    pub extra: Map<String, Value>,
}
impl Emoji {
    /// Case-insensitive shortcode membership.
    pub fn has_shortcode(&self, shortcode: &str) -> bool {
        let shortcode = shortcode.to_lowercase();
        self.shortcodes.iter().any(|s| s.to_lowercase() == shortcode)
    }
}
impl From<EmojiData> for Emoji {
    fn from(data: EmojiData) -> Self {
        let shortcodes = data.shortcodes.unwrap_or_default();
        let tags = data.tags.unwrap_or_default();
        let candidates = shortcodes
            .iter()
            .flat_map(|s| extract_tokens(s))
            .chain(tags.iter().flat_map(|t| extract_tokens(t)))
            .chain(extract_tokens(&data.annotation))
            .chain(data.emoticon.iter().flat_map(|e| e.iter().map(str::to_string)));
        Self {
            tokens: normalize_tokens(candidates),
            unicode: data.emoji,
            annotation: data.annotation,
            group: data.group,
            order: data.order,
            shortcodes,
            tags,
            emoticon: data.emoticon,
            version: data.version,
            extra: data.extra,
        }
    }
}
