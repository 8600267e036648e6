//! Record flattening
//!
//! Nested objects become `parent.child` columns and arrays become
//! `parent.0`, `parent.1`, ... so every leaf gets a path derived from its
//! structural position.

use degreed_domain::constants::{FLATTEN_ROOT_KEY, FLATTEN_SEPARATOR};
use degreed_domain::{FlatRow, Record};
use serde_json::Value;

/// Flatten one record into a single-level row.
///
/// Empty objects and arrays keep their column as a `null` leaf. A record
/// that is not an object is stored under [`FLATTEN_ROOT_KEY`].
pub fn flatten(record: &Record) -> FlatRow {
    let mut row = FlatRow::new();

    match record {
        Value::Object(map) if !map.is_empty() => {
            for (key, value) in map {
                walk(key.clone(), value, &mut row);
            }
        }
        other => walk(FLATTEN_ROOT_KEY.to_string(), other, &mut row),
    }

    row
}

/// Flatten every record, preserving order.
pub fn flatten_all(records: &[Record]) -> Vec<FlatRow> {
    records.iter().map(flatten).collect()
}

fn walk(path: String, value: &Value, row: &mut FlatRow) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                walk(join(&path, key), child, row);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                walk(join(&path, &index.to_string()), child, row);
            }
        }
        Value::Object(_) | Value::Array(_) => {
            row.insert(path, Value::Null);
        }
        leaf => {
            row.insert(path, leaf.clone());
        }
    }
}

fn join(parent: &str, child: &str) -> String {
    let mut path = String::with_capacity(parent.len() + child.len() + 1);
    path.push_str(parent);
    path.push(FLATTEN_SEPARATOR);
    path.push_str(child);
    path
}
