// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use cadence_cdc::{EventRing, Frame, ReplayOutcome, SubscriberId};
use cadence_core::Id;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Bound of a session's outbound frame channel (spec §4.8). Chosen well
/// above a single HTTP response's realistic backlog; a session that fills
/// this is treated as gone, not paused.
pub const SESSION_CHANNEL_CAPACITY: usize = 256;

/// What a freshly attached session should send before live frames start
/// flowing (spec §4.7 "Resume behavior").
pub enum Resume {
    /// No resume point was supplied; start from "now".
    None,
    /// The buffered suffix since the client's last seen event.
    Suffix(Vec<Arc<Frame>>),
    /// The client's resume point fell outside the retained window; it
    /// must resynchronize out of band before trusting this stream again.
    Recover,
}

/// A single subscriber's live connection to the ring. Bridges the ring's
/// synchronous, non-blocking fan-out (`crossbeam-channel`) onto an async
/// `tokio::sync::mpsc` channel that a transport (SSE, websocket, ...) can
/// poll inside an async task.
pub struct Session {
    id: SubscriberId,
    ring: Arc<EventRing>,
    outbox: mpsc::Receiver<Arc<Frame>>,
    bridge: JoinHandle<()>,
    resume: Resume,
}

impl Session {
    /// Attach to `ring`, resolving `last_event_id` against its current
    /// window atomically with registration (spec §4.7).
    pub fn attach(ring: &Arc<EventRing>, last_event_id: Option<&Id>) -> Self {
        let (subscriber_id, fanout_rx, outcome) = ring.attach(last_event_id);
        let (tx, rx) = mpsc::channel(SESSION_CHANNEL_CAPACITY);

        let bridge = tokio::task::spawn_blocking(move || {
            while let Ok(frame) = fanout_rx.recv() {
                if tx.blocking_send(frame).is_err() {
                    break;
                }
            }
        });

        let resume = match outcome {
            ReplayOutcome::NoReplay => Resume::None,
            ReplayOutcome::Suffix(frames) => Resume::Suffix(frames),
            ReplayOutcome::Recover => Resume::Recover,
        };

        Self { id: subscriber_id, ring: ring.clone(), outbox: rx, bridge, resume }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Takes the one-time resume instruction computed at attach time.
    /// After the first call this always returns [`Resume::None`].
    pub fn take_resume(&mut self) -> Resume {
        std::mem::replace(&mut self.resume, Resume::None)
    }

    /// Await the next live frame, or `None` once the ring has detached
    /// this session (slow consumer, or the ring itself shutting down).
    pub async fn recv(&mut self) -> Option<Arc<Frame>> {
        self.outbox.recv().await
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.ring.detach(self.id);
        self.bridge.abort();
        debug!(subscriber_id = self.id, "session dropped");
    }
}
