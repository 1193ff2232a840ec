use crate::method::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Optional leading segments prepended to every derived key, letting
/// callers namespace their keys away from other cache users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyPrefix {
    Single(String),
    Segments(Vec<String>),
}

impl From<&str> for KeyPrefix {
    fn from(value: &str) -> Self {
        KeyPrefix::Single(value.to_string())
    }
}

impl From<String> for KeyPrefix {
    fn from(value: String) -> Self {
        KeyPrefix::Single(value)
    }
}

impl From<Vec<String>> for KeyPrefix {
    fn from(value: Vec<String>) -> Self {
        KeyPrefix::Segments(value)
    }
}

/// One element of a derived cache key.
///
/// Serializes untagged, so a key flattens to the plain array shape
/// external cache layers compare: path text as strings, the input slot
/// as the input value (or `null` when absent), the method as its
/// lowercase name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum KeySegment {
    Text(String),
    Input(Option<Value>),
    Method(Method),
}

/// Ordered cache key: `[prefix…, path…, input, method]`.
///
/// Order is semantically meaningful (it is the route); equality is
/// segment-for-segment. The absent-input slot is `Input(None)`,
/// distinct from any path text and from an empty object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct QueryKey(Vec<KeySegment>);

impl QueryKey {
    pub fn segments(&self) -> &[KeySegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<KeySegment>> for QueryKey {
    fn from(segments: Vec<KeySegment>) -> Self {
        QueryKey(segments)
    }
}

/// Derives the cache key for one call.
///
/// Total and deterministic: identical inputs always yield keys whose
/// segments compare equal in the same order. The input is carried
/// verbatim — no sorting, hashing or canonicalization; equality
/// semantics on the input belong to the cache layer.
pub fn build_query_key(
    path: &[String],
    input: Option<&Value>,
    method: Method,
    prefix: Option<&KeyPrefix>,
) -> QueryKey {
    let mut segments = Vec::with_capacity(path.len() + 3);
    match prefix {
        Some(KeyPrefix::Single(name)) => segments.push(KeySegment::Text(name.clone())),
        Some(KeyPrefix::Segments(parts)) => {
            segments.extend(parts.iter().cloned().map(KeySegment::Text));
        }
        None => {}
    }
    segments.extend(path.iter().cloned().map(KeySegment::Text));
    segments.push(KeySegment::Input(input.cloned()));
    segments.push(KeySegment::Method(method));
    QueryKey(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_key_shape_without_prefix() {
        let key = build_query_key(&path(&["users", "profile"]), None, Method::Get, None);
        assert_eq!(
            key.segments(),
            &[
                KeySegment::Text("users".to_string()),
                KeySegment::Text("profile".to_string()),
                KeySegment::Input(None),
                KeySegment::Method(Method::Get),
            ]
        );
    }

    #[test]
    fn test_single_prefix_is_prepended() {
        let prefix = KeyPrefix::from("api");
        let key = build_query_key(&path(&["users"]), None, Method::Get, Some(&prefix));
        assert_eq!(key.segments()[0], KeySegment::Text("api".to_string()));
        assert_eq!(key.len(), 4);
    }

    #[test]
    fn test_segmented_prefix_preserves_order() {
        let prefix = KeyPrefix::from(vec!["v2".to_string(), "api".to_string()]);
        let key = build_query_key(&path(&["users"]), None, Method::Head, Some(&prefix));
        assert_eq!(
            &key.segments()[..2],
            &[
                KeySegment::Text("v2".to_string()),
                KeySegment::Text("api".to_string()),
            ]
        );
    }

    #[test]
    fn test_input_is_carried_verbatim() {
        let input = json!({"b": 2, "a": 1});
        let key = build_query_key(&path(&["users"]), Some(&input), Method::Get, None);
        assert_eq!(key.segments()[1], KeySegment::Input(Some(input)));
    }

    #[test]
    fn test_absent_input_differs_from_empty_object() {
        let absent = build_query_key(&path(&["users"]), None, Method::Get, None);
        let empty = build_query_key(&path(&["users"]), Some(&json!({})), Method::Get, None);
        assert_ne!(absent, empty);
    }

    #[test]
    fn test_serializes_to_flat_array() {
        let key = build_query_key(&path(&["users"]), None, Method::Get, None);
        let json = serde_json::to_value(&key).unwrap();
        assert_eq!(json, json!(["users", null, "get"]));
    }

    #[test]
    fn test_prefix_deserializes_from_string_or_array() {
        let single: KeyPrefix = serde_json::from_str("\"api\"").unwrap();
        assert_eq!(single, KeyPrefix::Single("api".to_string()));
        let parts: KeyPrefix = serde_json::from_str("[\"v2\", \"api\"]").unwrap();
        assert_eq!(
            parts,
            KeyPrefix::Segments(vec!["v2".to_string(), "api".to_string()])
        );
    }

    mod determinism {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn key_building_is_deterministic(
                path in prop::collection::vec("[a-z]{1,8}", 0..5),
                prefix in prop::option::of("[a-z]{1,8}"),
                has_input in any::<bool>(),
            ) {
                let prefix = prefix.map(KeyPrefix::from);
                let input = has_input.then(|| json!({"page": 1}));
                let first =
                    build_query_key(&path, input.as_ref(), Method::Get, prefix.as_ref());
                let second =
                    build_query_key(&path, input.as_ref(), Method::Get, prefix.as_ref());
                prop_assert_eq!(&first, &second);

                let expected_len = path.len() + 2 + usize::from(prefix.is_some());
                prop_assert_eq!(first.len(), expected_len);
            }
        }
    }
}
