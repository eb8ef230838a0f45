// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use async_trait::async_trait;
use cadence_core::{EngineConfig, Error};
use cadence_idempotency::IdempotencyStore;
use cadence_storage::{StorageAdapter, StorageTransaction};
use dashmap::DashMap;
use serde_json::Value as Json;
use std::sync::Arc;

/// Identity/authorization context the caller injects; the core itself makes
/// no policy decisions about it (spec §1 Non-goals).
#[derive(Clone, Debug, Default)]
pub struct CallerContext {
    pub subject: Option<String>,
}

/// A registered, named transactional procedure (spec §4.9). Mutators write
/// through the adapter directly — if they route writes through the
/// executor's own insert/update/upsert/delete path those writes emit
/// frames; direct adapter calls made here do not, by design (spec §4.9).
#[async_trait]
pub trait Mutator: Send + Sync {
    /// Validate `args`; a `BAD_REQUEST` error aborts before a transaction
    /// is opened.
    fn validate_args(&self, _args: &Json) -> Result<(), Error> {
        Ok(())
    }

    async fn invoke(
        &self,
        tx: &mut dyn StorageTransaction,
        args: Json,
        ctx: &CallerContext,
    ) -> Result<Json, Error>;
}

/// Looks mutators up by name and runs them with the same idempotency and
/// transactional rules as the mutation executor (spec §4.9).
pub struct MutatorRunner {
    adapter: Arc<dyn StorageAdapter>,
    idempotency: Arc<dyn IdempotencyStore>,
    config: EngineConfig,
    mutators: DashMap<String, Arc<dyn Mutator>>,
}

impl MutatorRunner {
    pub fn new(adapter: Arc<dyn StorageAdapter>, idempotency: Arc<dyn IdempotencyStore>, config: EngineConfig) -> Self {
        Self { adapter, idempotency, config, mutators: DashMap::new() }
    }

    pub fn register(&self, name: impl Into<String>, mutator: Arc<dyn Mutator>) {
        self.mutators.insert(name.into(), mutator);
    }

    pub async fn run(
        &self,
        name: &str,
        args: Json,
        ctx: CallerContext,
        idempotency_key: Option<String>,
    ) -> Result<(Json, bool), Error> {
        if let Some(key) = &idempotency_key {
            if self.idempotency.has(key).await {
                let cached = self.idempotency.get(key).await.unwrap_or(Json::Null);
                return Ok((with_duplicated(cached), true));
            }
        }

        let mutator = self
            .mutators
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::not_found(format!("no mutator registered: {name}")))?;

        mutator.validate_args(&args)?;

        let mut tx = self.adapter.begin().await?;
        match mutator.invoke(tx.as_mut(), args, &ctx).await {
            Ok(result) => {
                tx.commit().await?;
                let response = serde_json::json!({ "result": result });
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
}

fn with_duplicated(mut value: Json) -> Json {
    if let Json::Object(map) = &mut value {
        map.insert("duplicated".to_string(), Json::Bool(true));
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_idempotency::MemoryIdempotencyStore;
    use cadence_storage_memory::MemoryAdapter;
    use cadence_type::{Row, Value};

    struct Echo;

    #[async_trait]
    impl Mutator for Echo {
        fn validate_args(&self, args: &Json) -> Result<(), Error> {
            if args.get("fail").is_some() {
                return Err(Error::bad_request("fail requested"));
            }
            Ok(())
        }

        async fn invoke(
            &self,
            tx: &mut dyn StorageTransaction,
            args: Json,
            _ctx: &CallerContext,
        ) -> Result<Json, Error> {
            let mut row = Row::new();
            row.set("id", Value::Text("m1".into()));
            row.set("version", Value::Int(1));
            row.set("updatedAt", Value::Int(0));
            tx.insert("side_effects", row).await?;
            Ok(args)
        }
    }

    fn runner() -> MutatorRunner {
        let adapter: Arc<dyn StorageAdapter> = Arc::new(MemoryAdapter::new());
        let idempotency: Arc<dyn IdempotencyStore> = Arc::new(MemoryIdempotencyStore::new());
        MutatorRunner::new(adapter, idempotency, EngineConfig::default())
    }

    #[tokio::test]
    async fn missing_mutator_is_not_found() {
        let runner = runner();
        let err = runner.run("missing", Json::Null, CallerContext::default(), None).await.unwrap_err();
        assert_eq!(err.code, cadence_core::ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn invalid_args_never_opens_a_transaction() {
        let runner = runner();
        runner.register("echo", Arc::new(Echo));
        let err = runner
            .run("echo", serde_json::json!({"fail": true}), CallerContext::default(), None)
            .await
            .unwrap_err();
        assert_eq!(err.code, cadence_core::ErrorCode::BadRequest);
    }

    #[tokio::test]
    async fn second_call_under_same_key_is_not_reexecuted() {
        let runner = runner();
        runner.register("echo", Arc::new(Echo));
        let key = Some("k1".to_string());

        let (first, dup1) = runner
            .run("echo", serde_json::json!({"v": 1}), CallerContext::default(), key.clone())
            .await
            .unwrap();
        assert!(!dup1);

        let (second, dup2) = runner
            .run("echo", serde_json::json!({"v": 2}), CallerContext::default(), key)
            .await
            .unwrap();
        assert!(dup2);
        assert_eq!(first["result"], second["result"]);
    }
}
