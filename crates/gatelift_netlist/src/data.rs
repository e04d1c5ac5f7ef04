//! Typed key/value data attached to nets, gates, and modules.
//!
//! Data is addressed by `(category, key)` and stores a `(type, value)` pair,
//! both kept as strings exactly as the front-end supplied them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category under which HDL attributes are stored.
pub const ATTRIBUTE_CATEGORY: &str = "attribute";

/// Category under which instance generics are stored.
pub const GENERIC_CATEGORY: &str = "generic";

/// A single typed data value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataValue {
    /// The declared type of the value (e.g. `"string"`, `"integer"`).
    pub ty: String,
    /// The value in its textual form.
    pub value: String,
}

impl DataValue {
    /// Creates a new data value.
    pub fn new(ty: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            value: value.into(),
        }
    }
}

/// Sorted `(category, key) -> (type, value)` store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataMap {
    entries: BTreeMap<String, BTreeMap<String, DataValue>>,
}

impl DataMap {
    /// Creates an empty data map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `(category, key)`, returning the previous value.
    pub fn set(
        &mut self,
        category: impl Into<String>,
        key: impl Into<String>,
        value: DataValue,
    ) -> Option<DataValue> {
        self.entries
            .entry(category.into())
            .or_default()
            .insert(key.into(), value)
    }

    /// Looks up the value stored under `(category, key)`.
    pub fn get(&self, category: &str, key: &str) -> Option<&DataValue> {
        self.entries.get(category)?.get(key)
    }

    /// Returns the number of stored entries across all categories.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates `(category, key, value)` triples in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &DataValue)> {
        self.entries.iter().flat_map(|(category, keys)| {
            keys.iter()
                .map(move |(key, value)| (category.as_str(), key.as_str(), value))
        })
    }
}
