// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use cadence_core::cursor::{Cursor, LastSeen, OrderBy, SortDirection};
use cadence_type::{Row, Value};
use indexmap::IndexMap;
use std::cmp::Ordering;

/// One table's in-memory state: rows keyed by canonical pk, plus the
/// logical version side table (spec §3) kept alongside it.
#[derive(Default)]
pub struct TableState {
    pub rows: IndexMap<String, Row>,
    pub versions: IndexMap<String, i64>,
}

impl TableState {
    pub fn row_id(row: &Row) -> Option<String> {
        row.get("id").map(|v| v.to_string())
    }

    /// Sort a snapshot of rows by `order_by`, with `id ASC` as the
    /// permanent tie-break (spec §4.4).
    pub fn sorted(&self, order_by: &OrderBy) -> Vec<Row> {
        let mut rows: Vec<Row> = self.rows.values().cloned().collect();
        rows.sort_by(|a, b| compare_rows(a, b, order_by));
        rows
    }
}

fn compare_rows(a: &Row, b: &Row, order_by: &OrderBy) -> Ordering {
    let primary = compare_column(a, b, &order_by.column);
    let primary = match order_by.direction {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    };
    primary.then_with(|| compare_column(a, b, "id"))
}

fn compare_column(a: &Row, b: &Row, column: &str) -> Ordering {
    let missing = Value::Null;
    let av = a.get(column).unwrap_or(&missing);
    let bv = b.get(column).unwrap_or(&missing);
    av.cmp(bv)
}

/// Apply a decoded cursor's resume point, falling back to `id ASC` after
/// `last.id` when the cursor's `orderBy` doesn't match the request (spec
/// §4.3).
pub fn skip_to_resume_point<'a>(rows: &'a [Row], order_by: &OrderBy, cursor: &Cursor) -> &'a [Row] {
    if cursor.matches_order_by(order_by) {
        let idx = rows
            .iter()
            .position(|row| row_matches_last_seen(row, &cursor.last))
            .map(|i| i + 1)
            .unwrap_or(0);
        &rows[idx.min(rows.len())..]
    } else {
        let idx = rows
            .iter()
            .position(|row| TableState::row_id(row).as_deref() == Some(cursor.last.id.as_str()))
            .map(|i| i + 1)
            .unwrap_or(0);
        &rows[idx.min(rows.len())..]
    }
}

fn row_matches_last_seen(row: &Row, last: &LastSeen) -> bool {
    TableState::row_id(row).as_deref() == Some(last.id.as_str())
}

pub fn cursor_for(order_by: &OrderBy, table: &str, row: &Row) -> Cursor {
    let mut keys = IndexMap::new();
    if let Some(v) = row.get(&order_by.column) {
        keys.insert(order_by.column.clone(), v.clone());
    }
    Cursor {
        table: table.to_string(),
        order_by: order_by.clone(),
        last: LastSeen { keys, id: TableState::row_id(row).unwrap_or_default() },
    }
}
