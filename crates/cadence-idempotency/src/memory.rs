// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use crate::store::IdempotencyStore;
use async_trait::async_trait;
use cadence_core::time::now_millis;
use dashmap::DashMap;
use serde_json::Value;

struct Entry {
    response: Value,
    expires_at: u64,
}

/// The default, in-process [`IdempotencyStore`]. Expired entries are only
/// ever reaped when they're looked up again (spec §4.5) — there is no
/// background sweeper.
#[derive(Default)]
pub struct MemoryIdempotencyStore {
    entries: DashMap<String, Entry>,
}

impl MemoryIdempotencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_live(entry: &Entry) -> bool {
        entry.expires_at > now_millis()
    }
}

#[async_trait]
impl IdempotencyStore for MemoryIdempotencyStore {
    async fn has(&self, key: &str) -> bool {
        match self.entries.get(key) {
            Some(entry) if Self::is_live(&entry) => true,
            Some(_) => {
                drop(self.entries.remove(key));
                false
            }
            None => false,
        }
    }

    async fn get(&self, key: &str) -> Option<Value> {
        match self.entries.get(key) {
            Some(entry) if Self::is_live(&entry) => Some(entry.response.clone()),
            Some(_) => {
                drop(self.entries.remove(key));
                None
            }
            None => None,
        }
    }

    async fn set(&self, key: &str, response: Value, ttl_ms: u64) {
        self.entries
            .entry(key.to_string())
            .or_insert_with(|| Entry { response, expires_at: now_millis() + ttl_ms });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn second_set_under_same_key_does_not_overwrite() {
        let store = MemoryIdempotencyStore::new();
        store.set("k1", serde_json::json!({"row": "first"}), 60_000).await;
        store.set("k1", serde_json::json!({"row": "second"}), 60_000).await;

        let cached = store.get("k1").await.unwrap();
        assert_eq!(cached, serde_json::json!({"row": "first"}));
    }

    #[tokio::test]
    async fn expired_entry_is_swept_on_access() {
        let store = MemoryIdempotencyStore::new();
        store.set("k1", serde_json::json!({"row": "x"}), 0).await;

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        assert!(!store.has("k1").await);
        assert_eq!(store.get("k1").await, None);
    }

    #[tokio::test]
    async fn missing_key_is_not_live() {
        let store = MemoryIdempotencyStore::new();
        assert!(!store.has("missing").await);
        assert_eq!(store.get("missing").await, None);
    }
}
