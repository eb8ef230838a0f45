// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use cadence_cdc::{RowDiff, TableChange};
use cadence_type::Row;
use indexmap::IndexMap;

/// Accumulates the per-pk diff and version summary for one table touched
/// by a single mutation, as the executor dispatches rows one at a time
/// (spec §3 "Change frame", §4.6 "Diff & emission").
#[derive(Default)]
pub struct ChangeBuilder {
    pks: Vec<String>,
    row_versions: IndexMap<String, i64>,
    diffs: IndexMap<String, RowDiff>,
}

impl ChangeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an insert/update/upsert write: `written` is the minimal
    /// patch applied, not necessarily the full persisted row.
    pub fn record_write(&mut self, pk: impl Into<String>, version: i64, written: Row) {
        let pk = pk.into();
        self.pks.push(pk.clone());
        self.row_versions.insert(pk.clone(), version);
        self.diffs.insert(pk, RowDiff { set: Some(written), unset: None });
    }

    /// Record a delete: the diff body is empty (spec §4.6).
    pub fn record_delete(&mut self, pk: impl Into<String>) {
        let pk = pk.into();
        self.pks.push(pk.clone());
        self.diffs.insert(pk, RowDiff::default());
    }

    pub fn is_empty(&self) -> bool {
        self.pks.is_empty()
    }

    pub fn finish(self, table: impl Into<String>) -> TableChange {
        TableChange {
            name: table.into(),
            pks: self.pks,
            row_versions: if self.row_versions.is_empty() { None } else { Some(self.row_versions) },
            diffs: if self.diffs.is_empty() { None } else { Some(self.diffs) },
        }
    }
}
