// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use crate::diff::ChangeBuilder;
use crate::op::Mutation;
use crate::validator::RowValidator;
use cadence_cdc::EventRing;
use cadence_core::key::CanonicalKey;
use cadence_core::time::now_millis;
use cadence_core::{EngineConfig, Error, ErrorDetails, IdGenerator};
use cadence_idempotency::IdempotencyStore;
use cadence_storage::{StorageAdapter, StorageTransaction};
use cadence_type::{PrimaryKey, Row, Value};
use dashmap::DashMap;
use serde_json::Value as Json;
use std::sync::Arc;
use tracing::debug;

/// Resolve the effective idempotency key for a mutation request (spec §4.6
/// "Common pre-flight"). A header-supplied key always wins over a body
/// field, matching the same precedence rule the wire format documents for
/// `Idempotency-Key` vs `clientOpId`.
pub fn resolve_idempotency_key(header: Option<&str>, client_op_id: Option<&str>) -> Option<String> {
    header.or(client_op_id).map(str::to_string)
}

/// Drives one dispatched mutation through validation, the storage adapter,
/// ring emission, and the idempotency cache (spec §4.6).
pub struct Executor {
    adapter: Arc<dyn StorageAdapter>,
    ring: Arc<EventRing>,
    idempotency: Arc<dyn IdempotencyStore>,
    config: EngineConfig,
    ids: IdGenerator,
    validators: DashMap<String, Arc<dyn RowValidator>>,
}

impl Executor {
    pub fn new(
        adapter: Arc<dyn StorageAdapter>,
        ring: Arc<EventRing>,
        idempotency: Arc<dyn IdempotencyStore>,
        config: EngineConfig,
    ) -> Self {
        Self { adapter, ring, idempotency, config, ids: IdGenerator::new(), validators: DashMap::new() }
    }

    pub fn register_validator(&self, table: impl Into<String>, validator: Arc<dyn RowValidator>) {
        self.validators.insert(table.into(), validator);
    }

    /// Dispatch `mutation`, returning the response body and whether it was
    /// served from the idempotency cache. `idempotency_key` should already
    /// reflect header-over-body precedence (see [`resolve_idempotency_key`]).
    pub async fn execute(
        &self,
        mutation: Mutation,
        idempotency_key: Option<String>,
    ) -> Result<(Json, bool), Error> {
        if let Some(key) = &idempotency_key {
            if self.idempotency.has(key).await {
                let cached = self.idempotency.get(key).await.unwrap_or(Json::Null);
                return Ok((with_duplicated(cached), true));
            }
        }

        match &mutation {
            Mutation::Insert { rows, .. } | Mutation::Upsert { rows, .. } => self.check_batch_size(rows)?,
            _ => {}
        }

        let table = mutation.table().to_string();
        let tx_id = self.ids.next();
        let mut tx = self.adapter.begin().await?;

        match self.dispatch(tx.as_mut(), mutation).await {
            Ok((response, change)) => {
                tx.commit().await?;
                if !change.is_empty() {
                    debug!(tx_id = %tx_id, table = %table, "committed mutation, appending frame");
                    self.ring.append(tx_id, vec![change.finish(table)]);
                }
                if let Some(key) = &idempotency_key {
                    self.idempotency.set(key, response.clone(), self.config.idempotency_ttl_ms).await;
                }
                Ok((response, false))
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(err)
            }
        }
    }

    async fn dispatch(
        &self,
        tx: &mut dyn StorageTransaction,
        mutation: Mutation,
    ) -> Result<(Json, ChangeBuilder), Error> {
        match mutation {
            Mutation::Insert { table, rows } => self.dispatch_insert(tx, &table, rows).await,
            Mutation::Update { table, pk, set, if_version } => {
                self.dispatch_update(tx, &table, pk, set, if_version).await
            }
            Mutation::Upsert { table, rows, merge } => self.dispatch_upsert(tx, &table, rows, merge).await,
            Mutation::Delete { table, pk } => self.dispatch_delete(tx, &table, pk).await,
        }
    }

    async fn dispatch_insert(
        &self,
        tx: &mut dyn StorageTransaction,
        table: &str,
        rows: Vec<Row>,
    ) -> Result<(Json, ChangeBuilder), Error> {
        let mut change = ChangeBuilder::new();
        let mut persisted = Vec::with_capacity(rows.len());
        for mut row in rows {
            self.validate(table, &row)?;
            stamp_insert(&mut row, &self.ids);
            let result = tx.insert(table, row).await?;
            let pk = canonical_id(&result);
            change.record_write(pk, 1, result.clone());
            persisted.push(result);
        }
        Ok((rows_response(persisted), change))
    }

    async fn dispatch_update(
        &self,
        tx: &mut dyn StorageTransaction,
        table: &str,
        pk: PrimaryKey,
        set: Row,
        if_version: Option<i64>,
    ) -> Result<(Json, ChangeBuilder), Error> {
        self.validate(table, &set)?;
        tx.select_by_pk(table, &pk)
            .await?
            .ok_or_else(|| Error::not_found(format!("row not found: {}", CanonicalKey::from(&pk))))?;
        let current_version = tx.version_of(table, &pk).await?.unwrap_or(0);
        let next_version = current_version + 1;

        let mut patch = set;
        patch.remove("id");
        patch.remove("version");
        patch.set("updatedAt", Value::Int(now_millis() as i64));
        patch.set("version", Value::Int(next_version));

        let updated = tx.update_by_pk(table, &pk, patch.clone(), if_version).await?;

        let mut change = ChangeBuilder::new();
        change.record_write(CanonicalKey::from(&pk).as_str().to_string(), next_version, patch);
        Ok((row_response(updated), change))
    }

    async fn dispatch_upsert(
        &self,
        tx: &mut dyn StorageTransaction,
        table: &str,
        rows: Vec<Row>,
        merge: Option<Vec<String>>,
    ) -> Result<(Json, ChangeBuilder), Error> {
        let mut change = ChangeBuilder::new();
        let mut persisted = Vec::with_capacity(rows.len());
        for row in rows {
            self.validate(table, &row)?;
            let pk = PrimaryKey::scalar(row.get("id").cloned().unwrap_or(Value::Null));
            let existing = tx.select_by_pk(table, &pk).await?;

            match existing {
                None => {
                    let mut row = row;
                    stamp_insert(&mut row, &self.ids);
                    let result = tx.insert(table, row).await?;
                    change.record_write(canonical_id(&result), 1, result.clone());
                    persisted.push(result);
                }
                Some(current) => {
                    let canonical = CanonicalKey::from(&pk).as_str().to_string();
                    if matches!(&merge, Some(fields) if fields.is_empty()) {
                        return Err(Error::conflict(
                            format!("row already exists: {canonical}"),
                            ErrorDetails {
                                pk: Some(canonical),
                                constraint: Some("insert_only".to_string()),
                                ..Default::default()
                            },
                        ));
                    }

                    let current_version = tx.version_of(table, &pk).await?.unwrap_or_else(|| row_version(&current));
                    let next_version = current_version + 1;

                    let mut patch = match &merge {
                        Some(fields) => row.restrict_to(fields),
                        None => full_merge_patch(&row),
                    };
                    patch.remove("id");
                    patch.remove("version");
                    patch.set("updatedAt", Value::Int(now_millis() as i64));
                    patch.set("version", Value::Int(next_version));

                    let updated = tx.update_by_pk(table, &pk, patch.clone(), None).await?;
                    change.record_write(canonical, next_version, patch);
                    persisted.push(updated);
                }
            }
        }
        Ok((rows_response(persisted), change))
    }

    async fn dispatch_delete(
        &self,
        tx: &mut dyn StorageTransaction,
        table: &str,
        pk: PrimaryKey,
    ) -> Result<(Json, ChangeBuilder), Error> {
        tx.delete_by_pk(table, &pk).await?;
        let mut change = ChangeBuilder::new();
        change.record_delete(CanonicalKey::from(&pk).as_str().to_string());
        Ok((serde_json::json!({"ok": true}), change))
    }

    fn validate(&self, table: &str, row: &Row) -> Result<(), Error> {
        match self.validators.get(table) {
            Some(validator) => validator.validate(row),
            None => Ok(()),
        }
    }

    fn check_batch_size(&self, rows: &[Row]) -> Result<(), Error> {
        if rows.len() > self.config.batch_max_count {
            return Err(Error::bad_request(format!(
                "batch of {} rows exceeds batchMaxCount of {}",
                rows.len(),
                self.config.batch_max_count
            )));
        }
        Ok(())
    }
}

fn stamp_insert(row: &mut Row, ids: &IdGenerator) {
    let needs_id = !matches!(row.get("id"), Some(v) if !v.is_null());
    if needs_id {
        row.set("id", Value::Text(ids.next().as_str().to_string()));
    }
    row.set("version", Value::Int(1));
    row.set("updatedAt", Value::Int(now_millis() as i64));
}

fn row_version(row: &Row) -> i64 {
    match row.get("version") {
        Some(Value::Int(v)) => *v,
        _ => 0,
    }
}

fn canonical_id(row: &Row) -> String {
    let id = row.get("id").cloned().unwrap_or(Value::Null);
    CanonicalKey::from(&PrimaryKey::scalar(id)).as_str().to_string()
}

/// The default upsert merge (no `merge` field given): every field except
/// `id`, `updatedAt`, `version` (spec §9 open-question resolution).
fn full_merge_patch(row: &Row) -> Row {
    let mut patch = row.clone();
    patch.remove("id");
    patch.remove("updatedAt");
    patch.remove("version");
    patch
}

fn row_response(row: Row) -> Json {
    serde_json::json!({ "row": row })
}

fn rows_response(rows: Vec<Row>) -> Json {
    if rows.len() == 1 {
        serde_json::json!({ "row": rows.into_iter().next().expect("len checked above") })
    } else {
        serde_json::json!({ "rows": rows })
    }
}

fn with_duplicated(mut value: Json) -> Json {
    if let Json::Object(map) = &mut value {
        map.insert("duplicated".to_string(), Json::Bool(true));
    }
    value
}
