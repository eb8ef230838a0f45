// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use crate::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A request-supplied primary key, scalar or composite (spec §4.2).
///
/// Canonicalization (turning this into the string used as a map key and in
/// the version side table) lives in `cadence-core::key`, since that's where
/// the rest of the id/version stamping machinery lives.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryKey {
    Scalar(Value),
    Composite(IndexMap<String, Value>),
}

impl PrimaryKey {
    pub fn scalar(value: impl Into<Value>) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}
