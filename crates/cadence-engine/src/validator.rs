// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use cadence_core::Error;
use cadence_type::Row;

/// Optional per-table schema capability (spec §4.6, §9 "validators as an
/// optional per-table capability; absence is valid"). Validation is
/// partial: only fields present in `row` are checked, plus whatever
/// presence constraints the implementation wants to enforce.
pub trait RowValidator: Send + Sync {
    fn validate(&self, row: &Row) -> Result<(), Error>;
}
