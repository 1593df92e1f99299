//! Option mappings.
//!
//! Keys are kept exactly as stored; the same map is read by field accessors
//! and handed to providers.

use serde_json::Value;

pub use quire_sdk::Options;

/// Interpret a stored options column: `NULL` or a non-object yields an empty map.
pub fn from_stored(value: Option<Value>) -> Options {
    match value {
        Some(Value::Object(map)) => map,
        _ => Options::new(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stored_keys_are_kept_verbatim() {
        let stored = json!({"Slug": "first", "slug": "second", "Space-Id": {"Nested-Key": 1}});

        let options = from_stored(Some(stored.clone()));
        assert_eq!(options.len(), 3);
        assert_eq!(Value::Object(options), stored);
    }

    #[test]
    fn stored_null_is_empty_map() {
        assert!(from_stored(None).is_empty());
        assert!(from_stored(Some(Value::Null)).is_empty());
        assert!(from_stored(Some(json!("not a map"))).is_empty());
        assert_eq!(from_stored(Some(json!({"a": 1})))["a"], 1);
    }
}
