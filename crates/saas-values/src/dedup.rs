//! Canonical-form deduplication and list flattening.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// RFC 8785 (JCS) encoding of `item`, used as its identity.
///
/// Object keys are sorted by the canonicalizer, so two maps with the same
/// entries always produce the same key regardless of insertion order.
pub fn canonical_key<T: Serialize + ?Sized>(item: &T) -> Option<Vec<u8>> {
    serde_json_canonicalizer::to_vec(item).ok()
}

/// Remove duplicates, keeping the first occurrence of each item.
///
/// Items are compared through [`canonical_key`]. An item that cannot be
/// canonicalized is always kept.
pub fn distinct<T: Serialize>(items: Vec<T>) -> Vec<T> {
    let mut seen: HashSet<Vec<u8>> = HashSet::new();
    items
        .into_iter()
        .filter(|item| match canonical_key(item) {
            Some(key) => seen.insert(key),
            None => true,
        })
        .collect()
}

/// Flatten arbitrarily nested lists into one list, in encounter order.
pub fn flatten(items: &[Value]) -> Vec<Value> {
    let mut out = Vec::with_capacity(items.len());
    flatten_into(items, &mut out);
    out
}

fn flatten_into(items: &[Value], out: &mut Vec<Value>) {
    for item in items {
        match item {
            Value::Array(inner) => flatten_into(inner, out),
            other => out.push(other.clone()),
        }
    }
}
