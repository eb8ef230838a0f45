// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

//! The transactional mutation executor (spec §4.6) and the named mutator
//! runner (spec §4.9) — the two entry points that turn a parsed request
//! into storage-adapter calls, a ring frame, and an idempotency write.

mod diff;
mod executor;
mod mutator;
mod op;
mod validator;

pub use executor::{resolve_idempotency_key, Executor};
pub use mutator::{CallerContext, Mutator, MutatorRunner};
pub use op::Mutation;
pub use validator::RowValidator;
