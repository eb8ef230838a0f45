// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use cadence_core::Id;
use cadence_type::Row;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A per-row diff: `set` for insert/update/upsert, empty for delete
/// (spec §3, §4.6).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RowDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set: Option<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unset: Option<Vec<String>>,
}

/// One table's slice of a committed mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableChange {
    pub name: String,
    pub pks: Vec<String>,
    #[serde(rename = "rowVersions", skip_serializing_if = "Option::is_none")]
    pub row_versions: Option<IndexMap<String, i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diffs: Option<IndexMap<String, RowDiff>>,
}

/// An immutable, serialized-once record of one committed mutation
/// (spec §3). All frames sharing a `txId` came from the same commit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(rename = "eventId")]
    pub event_id: Id,
    #[serde(rename = "txId")]
    pub tx_id: Id,
    pub tables: Vec<TableChange>,
}

impl Frame {
    /// Serialize the frame exactly once so every fanned-out subscriber
    /// shares the same bytes (spec §4.7 step 2).
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("Frame is always serializable")
    }
}
