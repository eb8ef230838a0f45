// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use cadence_cdc::EventRing;
use cadence_engine::{Executor, MutatorRunner};
use cadence_storage::StorageAdapter;
use cadence_subscription::SessionRegistry;
use std::sync::Arc;

/// Shared handles every handler needs, cloned cheaply per request (spec §6).
#[derive(Clone)]
pub struct AppState {
    pub adapter: Arc<dyn StorageAdapter>,
    pub executor: Arc<Executor>,
    pub mutator_runner: Arc<MutatorRunner>,
    pub ring: Arc<EventRing>,
    pub session_registry: Arc<SessionRegistry>,
    pub keepalive_ms: u64,
}
