// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

//! Ids, canonical keys, cursors, the named engine config, and the flat
//! error taxonomy shared by every other cadence crate.

pub mod config;
pub mod cursor;
pub mod error;
pub mod id;
pub mod key;
pub mod time;

pub use config::EngineConfig;
pub use error::{Error, ErrorCode, ErrorDetails, Result};
pub use id::{Id, IdGenerator};
pub use key::CanonicalKey;
