// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use cadence_cdc::{EventRing, RingConfig};
use cadence_core::{EngineConfig, ErrorCode};
use cadence_engine::{Executor, Mutation};
use cadence_idempotency::{IdempotencyStore, MemoryIdempotencyStore};
use cadence_storage::StorageAdapter;
use cadence_storage_memory::MemoryAdapter;
use cadence_type::{PrimaryKey, Row, Value};
use std::sync::Arc;

fn executor() -> Executor {
    let adapter: Arc<dyn StorageAdapter> = Arc::new(MemoryAdapter::new());
    let ring = Arc::new(EventRing::new(RingConfig::default()));
    let idempotency: Arc<dyn IdempotencyStore> = Arc::new(MemoryIdempotencyStore::new());
    Executor::new(adapter, ring, idempotency, EngineConfig::default())
}

fn row_with_id(id: &str, title: &str) -> Row {
    let mut row = Row::new();
    row.set("id", Value::Text(id.to_string()));
    row.set("title", Value::Text(title.to_string()));
    row
}

/// S1 — CAS conflict.
#[tokio::test]
async fn cas_conflict_on_stale_if_version() {
    let executor = executor();

    let (body, dup) = executor
        .execute(
            Mutation::Insert { table: "items".to_string(), rows: vec![row_with_id("i1", "a")] },
            None,
        )
        .await
        .unwrap();
    assert!(!dup);
    assert_eq!(body["row"]["version"], 1);

    let mut set = Row::new();
    set.set("title", Value::Text("b".to_string()));
    let (body, _) = executor
        .execute(
            Mutation::Update {
                table: "items".to_string(),
                pk: PrimaryKey::scalar("i1"),
                set,
                if_version: Some(1),
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(body["row"]["version"], 2);

    let mut set = Row::new();
    set.set("title", Value::Text("c".to_string()));
    let err = executor
        .execute(
            Mutation::Update {
                table: "items".to_string(),
                pk: PrimaryKey::scalar("i1"),
                set,
                if_version: Some(1),
            },
            None,
        )
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::Conflict);
    let details = err.details.expect("conflict carries details");
    assert_eq!(details.expected_version, Some(1));
    assert_eq!(details.actual_version, Some(2));
}

/// S2 — Idempotency: duplicate submissions under one key return the first
/// response and never perform a second insert.
#[tokio::test]
async fn duplicate_insert_under_same_key_is_not_reexecuted() {
    let executor = executor();
    let mut row = Row::new();
    row.set("title", Value::Text("x".to_string()));

    let (first, dup1) = executor
        .execute(
            Mutation::Insert { table: "t".to_string(), rows: vec![row.clone()] },
            Some("k1".to_string()),
        )
        .await
        .unwrap();
    assert!(!dup1);
    assert_eq!(first["row"]["version"], 1);

    let (second, dup2) = executor
        .execute(Mutation::Insert { table: "t".to_string(), rows: vec![row] }, Some("k1".to_string()))
        .await
        .unwrap();
    assert!(dup2);
    assert_eq!(second["duplicated"], true);
    assert_eq!(second["row"]["id"], first["row"]["id"]);
}

/// S6 — Insert-only upsert: an empty merge list means a second upsert
/// against the same id conflicts instead of updating.
#[tokio::test]
async fn insert_only_upsert_conflicts_on_repeat() {
    let executor = executor();
    let (body, _) = executor
        .execute(
            Mutation::Upsert {
                table: "items".to_string(),
                rows: vec![row_with_id("i2", "first")],
                merge: Some(vec![]),
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(body["row"]["version"], 1);

    let err = executor
        .execute(
            Mutation::Upsert {
                table: "items".to_string(),
                rows: vec![row_with_id("i2", "second")],
                merge: Some(vec![]),
            },
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Conflict);
}

#[tokio::test]
async fn update_on_missing_row_is_not_found() {
    let executor = executor();
    let mut set = Row::new();
    set.set("title", Value::Text("x".to_string()));
    let err = executor
        .execute(
            Mutation::Update { table: "items".to_string(), pk: PrimaryKey::scalar("missing"), set, if_version: None },
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn delete_missing_row_is_not_found() {
    let executor = executor();
    let err = executor
        .execute(Mutation::Delete { table: "items".to_string(), pk: PrimaryKey::scalar("missing") }, None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn batch_over_max_count_is_bad_request() {
    let executor = executor();
    let rows: Vec<Row> = (0..101).map(|i| row_with_id(&format!("i{i}"), "x")).collect();
    let err = executor
        .execute(Mutation::Insert { table: "items".to_string(), rows }, None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::BadRequest);
}

#[tokio::test]
async fn failed_mutation_rolls_back_and_does_not_advance_version() {
    let executor = executor();
    executor
        .execute(Mutation::Insert { table: "items".to_string(), rows: vec![row_with_id("i3", "a")] }, None)
        .await
        .unwrap();

    let mut set = Row::new();
    set.set("title", Value::Text("conflicting".to_string()));
    let _ = executor
        .execute(
            Mutation::Update {
                table: "items".to_string(),
                pk: PrimaryKey::scalar("i3"),
                set,
                if_version: Some(999),
            },
            None,
        )
        .await
        .unwrap_err();

    let mut set = Row::new();
    set.set("title", Value::Text("b".to_string()));
    let (body, _) = executor
        .execute(
            Mutation::Update { table: "items".to_string(), pk: PrimaryKey::scalar("i3"), set, if_version: Some(1) },
            None,
        )
        .await
        .unwrap();
    assert_eq!(body["row"]["version"], 2);
}
