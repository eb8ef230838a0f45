// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

//! Storage adapter contract the mutation executor relies on but does not
//! implement (spec §4.4). Concrete engines — file-backed, remote SQL, or
//! the in-process reference adapter in `cadence-storage-memory` — live
//! outside this crate.

mod adapter;
mod error;
mod select;

pub use adapter::{StorageAdapter, StorageTransaction};
pub use error::StorageError;
pub use select::{DEFAULT_LIMIT, MAX_LIMIT, MIN_LIMIT, SelectWindow, WindowPage, clamp_limit};
