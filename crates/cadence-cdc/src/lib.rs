// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

//! The change-event ring and its fan-out to live subscribers (spec §4.7).
//! Frames are produced by the mutation executor on commit and consumed by
//! the subscription layer; this crate knows nothing about sessions,
//! transports, or HTTP — only about buffering and replay.

mod frame;
mod ring;

pub use frame::{Frame, RowDiff, TableChange};
pub use ring::{EventRing, ReplayOutcome, RingConfig, SubscriberId};
