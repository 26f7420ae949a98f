//! Deterministic version tags for payloads whose transport exposes none.

use exn::ResultExt;
use serde_json::{Map, Value};

use crate::error::{ErrorKind, Result};

/// Computes a stable checksum over the canonical JSON serialization of a
/// payload, for use as a version tag.
///
/// Object keys are sorted recursively before serialization, so two payloads
/// that differ only in key order produce the same tag regardless of how
/// `serde_json` was compiled (e.g. with `preserve_order`). Array order is
/// significant. The result is a lowercase hex BLAKE3 digest.
///
/// ```
/// use emojidb_extract::json_checksum;
/// use serde_json::json;
///
/// let a = json!([{"emoji": "😀", "order": 1}]);
/// let b = json!([{"order": 1, "emoji": "😀"}]);
/// assert_eq!(json_checksum(&a).unwrap(), json_checksum(&b).unwrap());
/// ```
pub fn json_checksum(payload: &Value) -> Result<String> {
    let bytes = serde_json::to_vec(&canonicalize(payload)).or_raise(|| ErrorKind::Serialize)?;
    Ok(blake3::hash(&bytes).to_string())
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let sorted: Map<String, Value> = keys.into_iter().map(|k| (k.clone(), canonicalize(&map[k]))).collect();
            Value::Object(sorted)
        },
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_checksum_is_stable_across_calls() {
        let payload = json!([{"emoji": "😀", "group": 0, "order": 1, "tags": ["face"]}]);
        assert_eq!(json_checksum(&payload).unwrap(), json_checksum(&payload.clone()).unwrap());
    }

    #[test]
    fn test_checksum_ignores_nested_key_order() {
        let a: Value = serde_json::from_str(r#"[{"a":1,"b":{"x":[1,2],"y":null}}]"#).unwrap();
        let b: Value = serde_json::from_str(r#"[{"b":{"y":null,"x":[1,2]},"a":1}]"#).unwrap();
        assert_eq!(json_checksum(&a).unwrap(), json_checksum(&b).unwrap());
    }

    #[test]
    fn test_checksum_detects_content_changes() {
        let a = json!([{"emoji": "😀", "order": 1}]);
        let b = json!([{"emoji": "😀", "order": 2}]);
        let c = json!([{"emoji": "😀", "order": 1}, {"emoji": "😂", "order": 2}]);
        assert_ne!(json_checksum(&a).unwrap(), json_checksum(&b).unwrap());
        assert_ne!(json_checksum(&a).unwrap(), json_checksum(&c).unwrap());
    }

    #[test]
    fn test_checksum_is_blake3_hex() {
        let tag = json_checksum(&json!([])).unwrap();
        assert_eq!(tag.len(), 64);
        assert!(tag.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
