// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

//! At-most-once response cache for the mutation pipeline (spec §4.5, §9).
//! The cache's purpose is not performance — it gives clients an
//! at-most-once guarantee across retries without distributed locking.

mod memory;
mod store;

pub use memory::MemoryIdempotencyStore;
pub use store::IdempotencyStore;
