//! Generic helpers over schema-less JSON values.
//!
//! The resolution engine reads catalogs as `serde_json::Value` trees and
//! never trusts their shape. This crate holds the building blocks it uses at
//! every stage: deep merge with override precedence, total accessors that
//! degrade to defaults on a type mismatch, and canonical-form deduplication.

mod access;
mod dedup;
mod merge;

pub use access::{any_true, get_bool, get_list, get_map, get_str, type_name};
pub use dedup::{canonical_key, distinct, flatten};
pub use merge::{deep_merge, merge, merge_layers};
