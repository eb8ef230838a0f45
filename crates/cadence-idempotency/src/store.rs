// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use async_trait::async_trait;
use serde_json::Value;

/// A key → response cache with TTL (spec §4.5). Implementations let
/// deployments share idempotency across processes; the default
/// [`crate::MemoryIdempotencyStore`] is sweep-on-access with no background
/// thread, sufficient for single-node correctness.
#[async_trait]
pub trait IdempotencyStore: Send + Sync {
    /// True if `key` has a live (unexpired) entry.
    async fn has(&self, key: &str) -> bool;

    /// The cached response for `key`, if it has a live entry.
    async fn get(&self, key: &str) -> Option<Value>;

    /// Store `response` under `key` for `ttl_ms` milliseconds. Does not
    /// overwrite an existing live entry — the first writer under a key
    /// wins for the lifetime of that entry (spec §3, §4.5).
    async fn set(&self, key: &str, response: Value, ttl_ms: u64);
}
