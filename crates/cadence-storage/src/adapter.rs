// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use crate::error::StorageError;
use crate::select::{SelectWindow, WindowPage};
use async_trait::async_trait;
use cadence_type::{PrimaryKey, Row};

/// The contract the mutation executor depends on (spec §4.4). Every
/// operation on a [`StorageTransaction`] must be atomic within the
/// transaction it was opened on; the adapter owns the version side table
/// transparently — callers never see it directly.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// One-time setup (creating the version side table, etc). Safe to call
    /// more than once.
    async fn ensure_meta(&self) -> Result<(), StorageError>;

    /// Open a new transaction. The adapter must support at least one
    /// active transaction per call; nested `begin` is not required.
    async fn begin(&self) -> Result<Box<dyn StorageTransaction>, StorageError>;
}

#[async_trait]
pub trait StorageTransaction: Send {
    /// Insert a new row. Fails with [`StorageError::Conflict`] on primary
    /// key collision, [`StorageError::Internal`] otherwise. Returns the
    /// persisted row shape on success.
    async fn insert(&mut self, table: &str, row: Row) -> Result<Row, StorageError>;

    /// Update fields of an existing row. Fails with
    /// [`StorageError::NotFound`] when the row is absent, and with
    /// [`StorageError::Conflict`] when `if_version` is provided and does
    /// not equal the currently persisted version.
    async fn update_by_pk(
        &mut self,
        table: &str,
        pk: &PrimaryKey,
        set: Row,
        if_version: Option<i64>,
    ) -> Result<Row, StorageError>;

    /// Fails with [`StorageError::NotFound`] when the row is absent.
    async fn delete_by_pk(&mut self, table: &str, pk: &PrimaryKey) -> Result<(), StorageError>;

    /// Returns the row, or `None` if absent.
    async fn select_by_pk(&mut self, table: &str, pk: &PrimaryKey) -> Result<Option<Row>, StorageError>;

    /// Ordered keyset-pagination read. Tie-break is always `id ASC`.
    async fn select_window(&mut self, table: &str, window: SelectWindow) -> Result<WindowPage, StorageError>;

    /// The logical `(table, pk_canonical) -> version` mapping the executor
    /// treats as authoritative for CAS and emission (spec §3).
    async fn version_of(&mut self, table: &str, pk: &PrimaryKey) -> Result<Option<i64>, StorageError>;

    async fn commit(self: Box<Self>) -> Result<(), StorageError>;

    async fn rollback(self: Box<Self>) -> Result<(), StorageError>;
}
