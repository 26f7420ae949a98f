use crate::error::{Error, ErrorKind};
use emojidb_extract::models::{Emoji, Emoticon};
use exn::ResultExt;
use serde_json::{Map, Value, from_str as from_json, to_string as to_json};

#[derive(sqlx::FromRow)]
pub(crate) struct EmojiRow {
    pub(crate) unicode: String,
    pub(crate) annotation: String,
    pub(crate) group_id: i64,
    pub(crate) sort_order: i64,
    pub(crate) shortcodes: String,
    pub(crate) tags: String,
    pub(crate) tokens: String,
    #[sqlx(default)]
    pub(crate) emoticon: Option<String>,
    #[sqlx(default)]
    pub(crate) version: Option<f64>,
    pub(crate) extra: String,
}
impl TryFrom<&Emoji> for EmojiRow {
    type Error = Error;
    fn try_from(emoji: &Emoji) -> Result<Self, Self::Error> {
        Ok(Self {
            unicode: emoji.unicode.clone(),
            annotation: emoji.annotation.clone(),
            group_id: i64::from(emoji.group),
            sort_order: i64::from(emoji.order),
            shortcodes: to_json(&emoji.shortcodes).or_raise(|| ErrorKind::InvalidData("shortcodes"))?,
            tags: to_json(&emoji.tags).or_raise(|| ErrorKind::InvalidData("tags"))?,
            tokens: to_json(&emoji.tokens).or_raise(|| ErrorKind::InvalidData("tokens"))?,
            emoticon: emoji
                .emoticon
                .as_ref()
                .map(|e| to_json(e).or_raise(|| ErrorKind::InvalidData("emoticon")))
                .transpose()?,
            version: emoji.version,
            extra: to_json(&emoji.extra).or_raise(|| ErrorKind::InvalidData("extra"))?,
        })
    }
}
impl TryFrom<EmojiRow> for Emoji {
    type Error = Error;
    fn try_from(row: EmojiRow) -> Result<Self, Self::Error> {
        Ok(Self {
            unicode: row.unicode,
            annotation: row.annotation,
            group: u32::try_from(row.group_id).or_raise(|| ErrorKind::InvalidData("group"))?,
            order: u32::try_from(row.sort_order).or_raise(|| ErrorKind::InvalidData("order"))?,
            shortcodes: from_json::<Vec<String>>(&row.shortcodes).or_raise(|| ErrorKind::InvalidData("shortcodes"))?,
            tags: from_json::<Vec<String>>(&row.tags).or_raise(|| ErrorKind::InvalidData("tags"))?,
            tokens: from_json::<Vec<String>>(&row.tokens).or_raise(|| ErrorKind::InvalidData("tokens"))?,
            emoticon: row
                .emoticon
                .map(|e| from_json::<Emoticon>(&e).or_raise(|| ErrorKind::InvalidData("emoticon")))
                .transpose()?,
            version: row.version,
            extra: from_json::<Map<String, Value>>(&row.extra).or_raise(|| ErrorKind::InvalidData("extra"))?,
        })
    }
}
