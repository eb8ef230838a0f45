// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use std::time::Duration;
use tokio::time::{interval, Interval};

/// Ticks at a fixed period so a transport can interleave keepalive frames
/// with live data on an otherwise idle connection (spec §4.8, §6 SSE
/// heartbeat). Proxies and load balancers between client and server often
/// close connections they believe have gone idle; this exists to prevent
/// that, not to signal anything to the client.
pub struct Heartbeat {
    ticker: Interval,
}

impl Heartbeat {
    pub fn new(period: Duration) -> Self {
        Self { ticker: interval(period) }
    }

    pub async fn tick(&mut self) {
        self.ticker.tick().await;
    }
}
