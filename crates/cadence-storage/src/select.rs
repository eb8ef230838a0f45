// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use cadence_core::cursor::{Cursor, OrderBy};
use cadence_type::Row;

pub const MIN_LIMIT: usize = 1;
pub const MAX_LIMIT: usize = 1_000;
pub const DEFAULT_LIMIT: usize = 100;

/// Parameters for an ordered keyset window read (spec §4.4). Ordering
/// tie-break is always `id ASC`, enforced by the adapter, not the caller.
#[derive(Clone, Debug)]
pub struct SelectWindow {
    pub order_by: OrderBy,
    pub limit: usize,
    pub cursor: Option<Cursor>,
    pub select: Option<Vec<String>>,
}

impl SelectWindow {
    pub fn new(order_by: OrderBy) -> Self {
        Self { order_by, limit: DEFAULT_LIMIT, cursor: None, select: None }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = clamp_limit(limit);
        self
    }

    pub fn with_cursor(mut self, cursor: Option<Cursor>) -> Self {
        self.cursor = cursor;
        self
    }
}

/// Clamp a caller-supplied limit into `[MIN_LIMIT, MAX_LIMIT]` (spec §4.4).
pub fn clamp_limit(limit: usize) -> usize {
    limit.clamp(MIN_LIMIT, MAX_LIMIT)
}

#[derive(Clone, Debug)]
pub struct WindowPage {
    pub data: Vec<Row>,
    pub next_cursor: Option<Cursor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_clamps_into_bounds() {
        assert_eq!(clamp_limit(0), MIN_LIMIT);
        assert_eq!(clamp_limit(5_000), MAX_LIMIT);
        assert_eq!(clamp_limit(42), 42);
    }
}
