//! Deep merge of JSON values
//!
//! Merge semantics:
//! - Objects: deep-merge by key
//! - Arrays: REPLACE (last wins)
//! - Scalars and null: override (last wins)

use serde_json::{Map, Value};

/// Deep merge two JSON values, consuming both.
///
/// When both sides are objects, keys of `overlay` are merged recursively into
/// `base`; keys only present in `base` are kept. In every other case the
/// overlay replaces the base entirely.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            Value::Object(merge_owned(base_map, overlay_map))
        }

        // Arrays: REPLACE (no concatenation)
        (Value::Array(_), overlay @ Value::Array(_)) => overlay,

        (_, overlay) => overlay,
    }
}

/// Merge two borrowed maps into a freshly allocated one.
///
/// Neither input is touched; the result never shares structure with them.
pub fn merge(base: &Map<String, Value>, overlay: &Map<String, Value>) -> Map<String, Value> {
    merge_owned(base.clone(), overlay.clone())
}

fn merge_owned(mut base: Map<String, Value>, overlay: Map<String, Value>) -> Map<String, Value> {
    for (key, overlay_value) in overlay {
        let merged = match base.remove(&key) {
            Some(base_value) => deep_merge(base_value, overlay_value),
            None => overlay_value,
        };
        base.insert(key, merged);
    }
    base
}

/// Merge multiple layers in order (first is base, last has highest precedence)
pub fn merge_layers(layers: Vec<Value>) -> Value {
    layers.into_iter().fold(Value::Null, deep_merge)
}
