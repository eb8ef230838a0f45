// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use crate::table::{TableState, cursor_for, skip_to_resume_point};
use async_trait::async_trait;
use cadence_core::key::CanonicalKey;
use cadence_storage::{SelectWindow, StorageAdapter, StorageError, StorageTransaction, WindowPage};
use cadence_type::{PrimaryKey, Row, Value};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

enum Undo {
    Insert { table: String, pk: String },
    Upsert { table: String, pk: String, prev_row: Row, prev_version: i64 },
    Delete { table: String, pk: String, prev_row: Row, prev_version: i64 },
}

/// A minimal in-process reference adapter (spec §4.4's concrete engines are
/// explicitly out of scope; this one exists only to make the executor and
/// HTTP surface runnable and testable end-to-end).
///
/// Transactions are serialized globally behind `commit_lock` rather than
/// using per-row locking — a deliberate simplification documented in
/// DESIGN.md, acceptable for a reference/test adapter.
#[derive(Clone)]
pub struct MemoryAdapter {
    tables: Arc<DashMap<String, Arc<RwLock<TableState>>>>,
    commit_lock: Arc<Mutex<()>>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self { tables: Arc::new(DashMap::new()), commit_lock: Arc::new(Mutex::new(())) }
    }

    fn table(&self, name: &str) -> Arc<RwLock<TableState>> {
        self.tables.entry(name.to_string()).or_default().clone()
    }
}

impl Default for MemoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageAdapter for MemoryAdapter {
    async fn ensure_meta(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn begin(&self) -> Result<Box<dyn StorageTransaction>, StorageError> {
        let guard = self.commit_lock.clone().lock_owned().await;
        Ok(Box::new(MemoryTransaction { tables: self.tables.clone(), _guard: guard, undo: Vec::new() }))
    }
}

pub struct MemoryTransaction {
    tables: Arc<DashMap<String, Arc<RwLock<TableState>>>>,
    _guard: OwnedMutexGuard<()>,
    undo: Vec<Undo>,
}

impl MemoryTransaction {
    fn table(&self, name: &str) -> Arc<RwLock<TableState>> {
        self.tables.entry(name.to_string()).or_default().clone()
    }

    fn row_version(row: &Row) -> i64 {
        match row.get("version") {
            Some(Value::Int(v)) => *v,
            _ => 0,
        }
    }
}

#[async_trait]
impl StorageTransaction for MemoryTransaction {
    async fn insert(&mut self, table: &str, row: Row) -> Result<Row, StorageError> {
        let pk = TableState::row_id(&row)
            .ok_or_else(|| StorageError::Internal("row is missing an id".to_string()))?;
        let state = self.table(table);
        let mut guard = state.write();
        if guard.rows.contains_key(&pk) {
            return Err(StorageError::pk_collision(pk));
        }
        let version = Self::row_version(&row);
        guard.rows.insert(pk.clone(), row.clone());
        guard.versions.insert(pk.clone(), version);
        self.undo.push(Undo::Insert { table: table.to_string(), pk });
        Ok(row)
    }

    async fn update_by_pk(
        &mut self,
        table: &str,
        pk: &PrimaryKey,
        set: Row,
        if_version: Option<i64>,
    ) -> Result<Row, StorageError> {
        let canonical = CanonicalKey::from(pk).as_str().to_string();
        let state = self.table(table);
        let mut guard = state.write();

        let current = guard
            .rows
            .get(&canonical)
            .cloned()
            .ok_or_else(|| StorageError::not_found(canonical.clone()))?;
        let current_version = *guard.versions.get(&canonical).unwrap_or(&0);

        if let Some(expected) = if_version {
            if expected != current_version {
                return Err(StorageError::version_conflict(canonical, expected, current_version));
            }
        }

        let merged = current.clone().merged(&set);
        let next_version = Self::row_version(&merged);
        guard.rows.insert(canonical.clone(), merged.clone());
        guard.versions.insert(canonical.clone(), next_version);
        self.undo.push(Undo::Upsert {
            table: table.to_string(),
            pk: canonical,
            prev_row: current,
            prev_version: current_version,
        });
        Ok(merged)
    }

    async fn delete_by_pk(&mut self, table: &str, pk: &PrimaryKey) -> Result<(), StorageError> {
        let canonical = CanonicalKey::from(pk).as_str().to_string();
        let state = self.table(table);
        let mut guard = state.write();
        let prev_row = guard
            .rows
            .shift_remove(&canonical)
            .ok_or_else(|| StorageError::not_found(canonical.clone()))?;
        let prev_version = guard.versions.shift_remove(&canonical).unwrap_or(0);
        self.undo.push(Undo::Delete { table: table.to_string(), pk: canonical, prev_row, prev_version });
        Ok(())
    }

    async fn select_by_pk(&mut self, table: &str, pk: &PrimaryKey) -> Result<Option<Row>, StorageError> {
        let canonical = CanonicalKey::from(pk).as_str().to_string();
        let state = self.table(table);
        let guard = state.read();
        Ok(guard.rows.get(&canonical).cloned())
    }

    async fn select_window(&mut self, table: &str, window: SelectWindow) -> Result<WindowPage, StorageError> {
        let state = self.table(table);
        let guard = state.read();
        let sorted = guard.sorted(&window.order_by);
        let remaining: &[Row] = match &window.cursor {
            Some(cursor) => skip_to_resume_point(&sorted, &window.order_by, cursor),
            None => &sorted,
        };

        let page: Vec<Row> = remaining.iter().take(window.limit).cloned().collect();
        let has_more = remaining.len() > window.limit;
        let next_cursor = if has_more {
            page.last().map(|row| cursor_for(&window.order_by, table, row))
        } else {
            None
        };

        let data = if let Some(fields) = &window.select {
            page.into_iter().map(|row| row.restrict_to(fields)).collect()
        } else {
            page
        };

        Ok(WindowPage { data, next_cursor })
    }

    async fn version_of(&mut self, table: &str, pk: &PrimaryKey) -> Result<Option<i64>, StorageError> {
        let canonical = CanonicalKey::from(pk).as_str().to_string();
        let state = self.table(table);
        let guard = state.read();
        Ok(guard.versions.get(&canonical).copied())
    }

    async fn commit(self: Box<Self>) -> Result<(), StorageError> {
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StorageError> {
        for undo in self.undo.into_iter().rev() {
            match undo {
                Undo::Insert { table, pk } => {
                    let state = self.table(&table);
                    let mut guard = state.write();
                    guard.rows.shift_remove(&pk);
                    guard.versions.shift_remove(&pk);
                }
                Undo::Upsert { table, pk, prev_row, prev_version } => {
                    let state = self.table(&table);
                    let mut guard = state.write();
                    guard.rows.insert(pk.clone(), prev_row);
                    guard.versions.insert(pk, prev_version);
                }
                Undo::Delete { table, pk, prev_row, prev_version } => {
                    let state = self.table(&table);
                    let mut guard = state.write();
                    guard.rows.insert(pk.clone(), prev_row);
                    guard.versions.insert(pk, prev_version);
                }
            }
        }
        Ok(())
    }
}
