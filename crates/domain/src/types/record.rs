//! Opaque records and their flattened, tabular form

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::endpoint::Endpoint;

/// One record from a page's `data` array. Schema varies per endpoint, so the
/// record stays a recursive JSON value.
pub type Record = Value;

/// Single-level mapping from structural path (`parent.child`, `parent.0`) to
/// a scalar leaf.
///
/// Keys are kept sorted so serialization is byte-stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatRow(BTreeMap<String, Value>);

impl FlatRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: String, leaf: Value) -> Option<Value> {
        self.0.insert(path, leaf)
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        self.0.get(path)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// View the row as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl FromIterator<(String, Value)> for FlatRow {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Flattened output of one extraction, in upstream record order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub endpoint: Endpoint,
    pub rows: Vec<FlatRow>,
    pub pages_fetched: usize,
}

impl Dataset {
    pub fn new(endpoint: Endpoint, rows: Vec<FlatRow>, pages_fetched: usize) -> Self {
        Self { endpoint, rows, pages_fetched }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Sorted union of every row's columns.
    pub fn columns(&self) -> Vec<String> {
        let columns: BTreeSet<&str> = self.rows.iter().flat_map(FlatRow::columns).collect();
        columns.into_iter().map(str::to_owned).collect()
    }
}
