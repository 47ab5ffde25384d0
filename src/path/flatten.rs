//! Flattening nested values into the path map and back.
//!
//! Flattening rules:
//! - non-empty objects are descended per key and leave no entry of their
//!   own; an empty object is not representable and vanishes on a round
//!   trip unless it sits inside an array
//! - arrays appear as a leaf at their own path (so length rules can
//!   observe them) and are additionally descended per element
//! - scalars are leaves
//!
//! Unflattening assigns container paths first and lets element paths
//! refine them, which keeps the array double-entry from producing
//! duplicate fields in the rebuilt value.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::segment::{FieldPath, Segment};

/// The flat working representation: concrete path to leaf value.
pub type FlatObject = BTreeMap<FieldPath, Value>;

/// Converts a nested value into its flat path map.
pub fn flatten(value: &Value) -> FlatObject {
    let mut flat = FlatObject::new();
    match value {
        Value::Object(map) => {
            for (name, child) in map {
                flatten_into(FieldPath::root().key(name), child, &mut flat);
            }
        }
        other => flatten_into(FieldPath::root(), other, &mut flat),
    }
    flat
}

fn flatten_into(path: FieldPath, value: &Value, flat: &mut FlatObject) {
    match value {
        Value::Object(map) => {
            for (name, child) in map {
                flatten_into(path.key(name), child, flat);
            }
        }
        Value::Array(items) => {
            flat.insert(path.clone(), value.clone());
            for (index, child) in items.iter().enumerate() {
                flatten_into(path.index(index), child, flat);
            }
        }
        leaf => {
            flat.insert(path, leaf.clone());
        }
    }
}

/// Rebuilds the nested value from a flat path map.
pub fn unflatten(flat: &FlatObject) -> Value {
    let mut root = Value::Object(Map::new());
    for (path, value) in flat {
        if path.is_root() {
            root = value.clone();
            continue;
        }
        insert_at(&mut root, path.segments(), value);
    }
    root
}

fn insert_at(root: &mut Value, segments: &[Segment], leaf: &Value) {
    let mut cursor = root;
    let mut iter = segments.iter().peekable();
    while let Some(segment) = iter.next() {
        let last = iter.peek().is_none();
        cursor = match segment {
            Segment::Key(name) => {
                if !matches!(cursor, Value::Object(_)) {
                    *cursor = Value::Object(Map::new());
                }
                match cursor {
                    Value::Object(map) => {
                        if last {
                            map.insert(name.clone(), leaf.clone());
                            return;
                        }
                        map.entry(name.clone()).or_insert(Value::Null)
                    }
                    _ => return,
                }
            }
            Segment::Index(index) => {
                if !matches!(cursor, Value::Array(_)) {
                    *cursor = Value::Array(Vec::new());
                }
                match cursor {
                    Value::Array(items) => {
                        while items.len() <= *index {
                            items.push(Value::Null);
                        }
                        if last {
                            items[*index] = leaf.clone();
                            return;
                        }
                        &mut items[*index]
                    }
                    _ => return,
                }
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn round_trip(value: Value) {
        assert_eq!(unflatten(&flatten(&value)), value);
    }

    #[test]
    fn test_scalar_leaves() {
        let flat = flatten(&json!({"a": 1, "b": "x", "c": true, "d": null}));
        assert_eq!(flat.len(), 4);
        assert_eq!(flat.get(&FieldPath::root().key("a")), Some(&json!(1)));
        round_trip(json!({"a": 1, "b": "x", "c": true, "d": null}));
    }

    #[test]
    fn test_nested_objects_descend() {
        let flat = flatten(&json!({"field": {"sub": {"subfield": "test"}}}));
        let path = FieldPath::root().key("field").key("sub").key("subfield");
        assert_eq!(flat.len(), 1);
        assert_eq!(flat.get(&path), Some(&json!("test")));
        round_trip(json!({"field": {"sub": {"subfield": "test"}}}));
    }

    #[test]
    fn test_array_has_container_and_elements() {
        let flat = flatten(&json!({"arr": [23, 42]}));
        let container = FieldPath::root().key("arr");
        assert_eq!(flat.get(&container), Some(&json!([23, 42])));
        assert_eq!(flat.get(&container.index(0)), Some(&json!(23)));
        assert_eq!(flat.get(&container.index(1)), Some(&json!(42)));
        assert_eq!(flat.len(), 3);
    }

    #[test]
    fn test_empty_array_is_a_leaf() {
        let flat = flatten(&json!({"box": []}));
        assert_eq!(flat.len(), 1);
        assert_eq!(flat.get(&FieldPath::root().key("box")), Some(&json!([])));
        round_trip(json!({"box": []}));
    }

    #[test]
    fn test_unflatten_adds_no_extra_fields() {
        let rebuilt = unflatten(&flatten(&json!({"field": [42]})));
        let map = rebuilt.as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["field"], json!([42]));
    }

    #[test]
    fn test_array_of_objects_round_trip() {
        round_trip(json!({"arr": [{"foo": "bar"}, {"foo": "baz", "n": 1}]}));
    }

    #[test]
    fn test_unflatten_pads_sparse_indices() {
        let mut flat = FlatObject::new();
        flat.insert(FieldPath::root().key("arr").index(2), json!("z"));
        assert_eq!(unflatten(&flat), json!({"arr": [null, null, "z"]}));
    }

    #[test]
    fn test_empty_input_round_trip() {
        assert!(flatten(&json!({})).is_empty());
        assert_eq!(unflatten(&FlatObject::new()), json!({}));
    }

    #[test]
    fn test_inserted_path_creates_chain() {
        let mut flat = FlatObject::new();
        flat.insert(
            FieldPath::root().key("field").key("sub").key("subfield"),
            json!("test"),
        );
        assert_eq!(
            unflatten(&flat),
            json!({"field": {"sub": {"subfield": "test"}}})
        );
    }
}
