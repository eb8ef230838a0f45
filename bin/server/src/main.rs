// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use cadence_cdc::{EventRing, RingConfig};
use cadence_core::EngineConfig;
use cadence_engine::{Executor, MutatorRunner};
use cadence_http::AppState;
use cadence_idempotency::{IdempotencyStore, MemoryIdempotencyStore};
use cadence_storage::StorageAdapter;
use cadence_storage_memory::MemoryAdapter;
use cadence_subscription::SessionRegistry;
use std::net::SocketAddr;
use std::sync::Arc;

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn config_from_env() -> EngineConfig {
    let defaults = EngineConfig::default();
    EngineConfig {
        buffer_ms: env_u64("CADENCE_BUFFER_MS", defaults.buffer_ms),
        buffer_cap: env_usize("CADENCE_BUFFER_CAP", defaults.buffer_cap),
        keepalive_ms: env_u64("CADENCE_KEEPALIVE_MS", defaults.keepalive_ms),
        idempotency_ttl_ms: env_u64("CADENCE_IDEMPOTENCY_TTL_MS", defaults.idempotency_ttl_ms),
        batch_max_count: env_usize("CADENCE_BATCH_MAX_COUNT", defaults.batch_max_count),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = config_from_env();

    let adapter: Arc<dyn StorageAdapter> = Arc::new(MemoryAdapter::new());
    adapter.ensure_meta().await.expect("storage adapter setup must not fail at startup");

    let ring = Arc::new(EventRing::new(RingConfig {
        buffer_ms: config.buffer_ms,
        buffer_cap: config.buffer_cap,
        subscriber_capacity: cadence_subscription::SESSION_CHANNEL_CAPACITY,
    }));
    let idempotency: Arc<dyn IdempotencyStore> = Arc::new(MemoryIdempotencyStore::new());

    let executor = Arc::new(Executor::new(adapter.clone(), ring.clone(), idempotency.clone(), config.clone()));
    let mutator_runner = Arc::new(MutatorRunner::new(adapter.clone(), idempotency, config.clone()));

    let state = AppState {
        adapter,
        executor,
        mutator_runner,
        ring,
        session_registry: Arc::new(SessionRegistry::new()),
        keepalive_ms: config.keepalive_ms,
    };

    let app = cadence_http::router(state);

    let port = env_u64("CADENCE_PORT", 8080) as u16;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await.expect("bind the configured port");

    tracing::info!(%addr, "cadence-server listening");
    axum::serve(listener, app).await.expect("server must not exit while the process is alive");
}
