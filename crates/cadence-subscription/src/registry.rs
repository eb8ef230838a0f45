// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use cadence_cdc::SubscriberId;
use cadence_core::time::now_millis;
use dashmap::DashMap;

#[derive(Clone, Copy, Debug)]
struct SessionInfo {
    attached_at_ms: u64,
}

/// Tracks which sessions are currently live, independent of the ring's own
/// fan-out bookkeeping. Used for introspection (active subscriber counts)
/// rather than delivery — delivery is entirely the ring's concern.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<SubscriberId, SessionInfo>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_attach(&self, id: SubscriberId) {
        self.sessions.insert(id, SessionInfo { attached_at_ms: now_millis() });
    }

    pub fn record_detach(&self, id: SubscriberId) {
        self.sessions.remove(&id);
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }
}
