//! Deep merge of meta updates into existing properties.

use serde_json::{Map, Value};

/// Merge `patch` into `target`, leaf by leaf.
///
/// A mapping merges into a mapping recursively. Any other patch value,
/// including `null` and sequences, replaces the target value outright.
/// Keys absent from `patch` are left untouched.
pub fn deep_merge(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, incoming) in patch {
        match (target.get_mut(key), incoming) {
            (Some(Value::Object(existing)), Value::Object(nested)) => deep_merge(existing, nested),
            _ => {
                target.insert(key.clone(), incoming.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_merge_nested_preserves_siblings() {
        let mut target = object(json!({ "pane": { "left": 1, "top": 2 }, "open": true }));
        deep_merge(&mut target, &object(json!({ "pane": { "left": 9 } })));
        assert_eq!(
            Value::Object(target),
            json!({ "pane": { "left": 9, "top": 2 }, "open": true })
        );
    }

    #[test]
    fn test_merge_leaf_overwrites() {
        let mut target = object(json!({ "value": "a", "rows": [1, 2, 3] }));
        deep_merge(&mut target, &object(json!({ "value": null, "rows": [9] })));
        assert_eq!(Value::Object(target), json!({ "value": null, "rows": [9] }));
    }

    #[test]
    fn test_merge_object_over_scalar() {
        let mut target = object(json!({ "filter": "none" }));
        deep_merge(&mut target, &object(json!({ "filter": { "column": "id" } })));
        assert_eq!(Value::Object(target), json!({ "filter": { "column": "id" } }));
    }

    #[test]
    fn test_merge_scalar_over_object() {
        let mut target = object(json!({ "filter": { "column": "id" } }));
        deep_merge(&mut target, &object(json!({ "filter": 0 })));
        assert_eq!(Value::Object(target), json!({ "filter": 0 }));
    }

    #[test]
    fn test_merge_empty_patch_is_noop() {
        let original = object(json!({ "a": { "b": 1 } }));
        let mut target = original.clone();
        deep_merge(&mut target, &Map::new());
        assert_eq!(target, original);
    }
}
