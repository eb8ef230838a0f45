// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use crate::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An ordered column-name → value mapping for a single row.
///
/// Ordered so that re-serializing a row for a client always reproduces the
/// same field order it was read in, rather than whatever a hash map happens
/// to iterate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(IndexMap<String, Value>);

impl Row {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn set(&mut self, column: impl Into<String>, value: Value) {
        self.0.insert(column.into(), value);
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.0.shift_remove(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Apply `other` on top of `self`, field by field, returning `self`.
    pub fn merged(mut self, other: &Row) -> Row {
        for (k, v) in other.iter() {
            self.0.insert(k.clone(), v.clone());
        }
        self
    }

    /// Keep only the named fields (used to apply an upsert `merge` filter).
    pub fn restrict_to(&self, fields: &[String]) -> Row {
        let mut restricted = Row::new();
        for field in fields {
            if let Some(v) = self.get(field) {
                restricted.set(field.clone(), v.clone());
            }
        }
        restricted
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_overwrites_shared_fields_only() {
        let mut base = Row::new();
        base.set("id", Value::Text("i1".into()));
        base.set("title", Value::Text("a".into()));

        let mut patch = Row::new();
        patch.set("title", Value::Text("b".into()));

        let merged = base.merged(&patch);
        assert_eq!(merged.get("id"), Some(&Value::Text("i1".into())));
        assert_eq!(merged.get("title"), Some(&Value::Text("b".into())));
    }

    #[test]
    fn restrict_to_drops_unlisted_fields() {
        let mut row = Row::new();
        row.set("id", Value::Text("i1".into()));
        row.set("title", Value::Text("a".into()));
        row.set("secret", Value::Text("x".into()));

        let restricted = row.restrict_to(&["title".to_string()]);
        assert_eq!(restricted.get("title"), Some(&Value::Text("a".into())));
        assert_eq!(restricted.get("id"), None);
        assert_eq!(restricted.get("secret"), None);
    }
}
