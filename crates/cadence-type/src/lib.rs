// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

//! Row and value representations shared by the storage contract, the
//! mutation executor, and the HTTP surface. Row bodies are otherwise
//! opaque to the engine — this crate only defines the scalar shape a JSON
//! request body can carry.

mod primary_key;
mod row;
mod value;

pub use primary_key::PrimaryKey;
pub use row::Row;
pub use value::Value;
