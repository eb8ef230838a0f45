// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

/// Named (not positional) configuration for the engine (spec §6). Every
/// field has the documented default, so deployments only need to override
/// what they deviate on.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Event ring time window, in milliseconds.
    pub buffer_ms: u64,
    /// Event ring max retained frames.
    pub buffer_cap: usize,
    /// Subscriber heartbeat interval, in milliseconds.
    pub keepalive_ms: u64,
    /// Idempotency entry lifetime, in milliseconds.
    pub idempotency_ttl_ms: u64,
    /// Insert/upsert batch cap.
    pub batch_max_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            buffer_ms: 60_000,
            buffer_cap: 10_000,
            keepalive_ms: 15_000,
            idempotency_ttl_ms: 600_000,
            batch_max_count: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = EngineConfig::default();
        assert_eq!(config.buffer_ms, 60_000);
        assert_eq!(config.buffer_cap, 10_000);
        assert_eq!(config.keepalive_ms, 15_000);
        assert_eq!(config.idempotency_ttl_ms, 600_000);
        assert_eq!(config.batch_max_count, 100);
    }
}
