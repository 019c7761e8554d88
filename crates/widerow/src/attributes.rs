//! Attribute bags
//!
//! The column/value map an entity holds. Column names are case-normalized
//! exactly once, when a bag is hydrated from a raw store row; no later
//! operation re-normalizes, so lookups after hydration are exact and
//! cheap.

use std::collections::{BTreeSet, HashMap};

use crate::client::StoreRow;
use crate::value::StoreValue;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeBag {
    values: HashMap<String, StoreValue>,
}

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate from a raw store row, lowercasing column names here and
    /// nowhere else.
    pub fn from_row(row: StoreRow) -> Self {
        let values = row
            .into_iter()
            .map(|(column, value)| (column.to_ascii_lowercase(), value))
            .collect();
        Self { values }
    }

    pub fn get(&self, column: &str) -> Option<&StoreValue> {
        self.values.get(column)
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<StoreValue>) {
        self.values.insert(column.into(), value.into());
    }

    pub fn remove(&mut self, column: &str) -> Option<StoreValue> {
        self.values.remove(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StoreValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Columns whose value differs from `original`, computed over the
    /// union of both bags so that added and removed columns both count.
    /// Sorted, so callers get a deterministic order.
    pub fn changed_from(&self, original: &AttributeBag) -> Vec<String> {
        let mut union: BTreeSet<&str> = self.values.keys().map(String::as_str).collect();
        union.extend(original.values.keys().map(String::as_str));
        union
            .into_iter()
            .filter(|column| self.values.get(*column) != original.values.get(*column))
            .map(str::to_owned)
            .collect()
    }
}
