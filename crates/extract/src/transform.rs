//! Payload validation and conversion into [`Emoji`] records.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::models::{Emoji, EmojiData};

/// Validates a raw payload and converts every entry into an [`Emoji`].
///
/// The payload must be a non-empty JSON array of emoji entries. Each entry
/// needs at least `annotation`, `emoji`, `group` and `order`; unknown fields
/// are carried through. Primary keys and `(group, order)` positions must be
/// unique across the payload, otherwise the store would reject the load
/// half-way through.
///
/// This is a pure function: calling it twice with the same payload yields
/// the same records in the same order.
///
/// ```
/// use emojidb_extract::transform;
/// use serde_json::json;
///
/// let payload = json!([
///     {"annotation": "grinning face", "emoji": "😀", "group": 0, "order": 1, "shortcodes": ["grinning_face"]},
/// ]);
/// let emojis = transform(&payload).unwrap();
/// assert_eq!(emojis[0].unicode, "😀");
/// assert_eq!(emojis[0].tokens, vec!["face", "grinning"]);
/// ```
#[instrument(skip(payload))]
pub fn transform(payload: &Value) -> Result<Vec<Emoji>> {
    let entries = validate(payload)?;
    let mut keys = HashSet::with_capacity(entries.len());
    let mut positions = HashSet::with_capacity(entries.len());
    let mut emojis = Vec::with_capacity(entries.len());
    for data in entries {
        if !keys.insert(data.emoji.clone()) {
            exn::bail!(ErrorKind::Duplicate {
                field: "emoji",
                value: data.emoji,
            });
        }
        if !positions.insert((data.group, data.order)) {
            exn::bail!(ErrorKind::Duplicate {
                field: "group/order",
                value: format!("{}/{}", data.group, data.order),
            });
        }
        emojis.push(Emoji::from(data));
    }
    tracing::debug!(count = emojis.len(), "Transformed emoji data");
    Ok(emojis)
}

/// Checks the overall shape of the payload and decodes each entry.
pub fn validate(payload: &Value) -> Result<Vec<EmojiData>> {
    let Value::Array(entries) = payload else {
        exn::bail!(ErrorKind::WrongFormat);
    };
    if entries.is_empty() {
        exn::bail!(ErrorKind::Empty);
    }
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            if !entry.is_object() {
                return Err(exn::Exn::from(ErrorKind::WrongFormat));
            }
            EmojiData::deserialize(entry).map_err(|e| {
                exn::Exn::from(ErrorKind::InvalidEntry {
                    index,
                    reason: e.to_string(),
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn entry(emoji: &str, group: u32, order: u32) -> Value {
        json!({
            "annotation": format!("emoji {emoji}"),
            "emoji": emoji,
            "group": group,
            "order": order,
            "tags": ["tag"],
        })
    }

    #[test]
    fn test_transform_preserves_payload_order() {
        let payload = json!([entry("😂", 0, 5), entry("😀", 0, 1)]);
        let emojis = transform(&payload).unwrap();
        let keys: Vec<_> = emojis.iter().map(|e| e.unicode.as_str()).collect();
        assert_eq!(keys, vec!["😂", "😀"]);
    }

    #[test]
    fn test_transform_passes_through_unknown_fields() {
        let payload = json!([{
            "annotation": "thumbs up",
            "emoji": "👍",
            "group": 1,
            "order": 10,
            "skins": [{"tone": 1, "emoji": "👍🏻", "version": 1}],
            "hexcode": "1F44D",
        }]);
        let emoji = transform(&payload).unwrap().remove(0);
        assert_eq!(emoji.extra.get("hexcode"), Some(&json!("1F44D")));
        assert_eq!(emoji.extra.get("skins").and_then(Value::as_array).map(Vec::len), Some(1));
    }

    #[rstest]
    #[case(json!({"emoji": "😀"}), ErrorKind::WrongFormat)]
    #[case(json!("nope"), ErrorKind::WrongFormat)]
    #[case(json!([]), ErrorKind::Empty)]
    #[case(json!([1, 2]), ErrorKind::WrongFormat)]
    fn test_validate_rejects_bad_shapes(#[case] payload: Value, #[case] expected: ErrorKind) {
        let err = validate(&payload).unwrap_err();
        assert_eq!(&*err, &expected);
    }

    #[test]
    fn test_validate_reports_missing_fields() {
        let payload = json!([entry("😀", 0, 1), {"emoji": "😂", "group": 0}]);
        let err = validate(&payload).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidEntry { index: 1, .. }));
    }

    #[test]
    fn test_transform_rejects_duplicate_keys() {
        let payload = json!([entry("😀", 0, 1), entry("😀", 0, 2)]);
        let err = transform(&payload).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Duplicate { field: "emoji", .. }));
    }

    #[test]
    fn test_transform_rejects_duplicate_positions() {
        let payload = json!([entry("😀", 3, 1), entry("😂", 3, 1)]);
        let err = transform(&payload).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Duplicate { field: "group/order", .. }));
    }
}
