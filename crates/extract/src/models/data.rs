use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of the remote emoji payload, as published by the data source.
///
/// Only the fields the store indexes are named; everything else (skin tone
/// variations, hexcodes, labels...) is captured in `extra` and passed through
/// to the stored record untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmojiData {
    pub annotation: String,
    pub emoji: String,
    pub group: u32,
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcodes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoticon: Option<Emoticon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Emoticons are published either as a single string or as a list of
/// alternatives, depending on the dataset version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Emoticon {
    One(String),
    Many(Vec<String>),
}
impl Emoticon {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let slice = match self {
            Self::One(one) => std::slice::from_ref(one),
            Self::Many(many) => many.as_slice(),
        };
        slice.iter().map(String::as_str)
    }
}
