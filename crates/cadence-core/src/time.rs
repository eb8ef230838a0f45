// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch, used to stamp `updatedAt` and ring
/// append timestamps (spec §3, §4.7).
pub fn now_millis() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
}
