// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

//! Live subscriber sessions over the change-event ring (spec §4.8). A
//! [`Session`] is transport-agnostic — it knows how to resume and how to
//! receive frames, nothing about SSE, websockets, or HTTP.

mod heartbeat;
mod registry;
mod session;

pub use heartbeat::Heartbeat;
pub use registry::SessionRegistry;
pub use session::{Resume, Session, SESSION_CHANNEL_CAPACITY};
