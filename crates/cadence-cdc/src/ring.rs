// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use crate::frame::{Frame, TableChange};
use cadence_core::id::IdGenerator;
use cadence_core::time::now_millis;
use cadence_core::Id;
use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::debug;

/// A buffered handle to the ring's most recent frames, returned from
/// [`EventRing::attach`] (spec §4.7 "Resume behavior").
#[derive(Debug)]
pub enum ReplayOutcome {
    /// The subscriber attached without a resume point; nothing to replay.
    NoReplay,
    /// `lastEventId` is still in the ring — these frames are the gap.
    Suffix(Vec<Arc<Frame>>),
    /// `lastEventId` predates the ring's retained window; the caller must
    /// fall back to a full resync instead of trusting the stream.
    Recover,
}

/// Tuning knobs for [`EventRing`], read from configuration (spec §4.7).
#[derive(Clone, Copy, Debug)]
pub struct RingConfig {
    /// Frames older than this are pruned on the next append.
    pub buffer_ms: u64,
    /// The ring never holds more than this many frames regardless of age.
    pub buffer_cap: usize,
    /// Per-subscriber channel capacity before it is considered too slow
    /// and detached (spec §4.8 "a session that cannot keep up is dropped,
    /// never allowed to block the writer").
    pub subscriber_capacity: usize,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self { buffer_ms: 60_000, buffer_cap: 10_000, subscriber_capacity: 256 }
    }
}

struct FrameEntry {
    event_id: Id,
    frame: Arc<Frame>,
    appended_at_ms: u64,
}

pub type SubscriberId = u64;

struct RingState {
    frames: VecDeque<FrameEntry>,
    subscribers: HashMap<SubscriberId, Sender<Arc<Frame>>>,
    next_subscriber_id: SubscriberId,
}

/// An append-only, age-and-count-bounded buffer of committed [`Frame`]s
/// with non-blocking fan-out to live subscribers (spec §4.7).
///
/// One [`Mutex`] guards both the frame window and the subscriber set so
/// that replay-on-attach and append-with-fanout can never interleave:
/// a subscriber always sees either "before this frame" or "after it",
/// never a gap and never a duplicate.
pub struct EventRing {
    config: RingConfig,
    ids: IdGenerator,
    state: Mutex<RingState>,
}

impl EventRing {
    pub fn new(config: RingConfig) -> Self {
        Self {
            config,
            ids: IdGenerator::new(),
            state: Mutex::new(RingState {
                frames: VecDeque::new(),
                subscribers: HashMap::new(),
                next_subscriber_id: 0,
            }),
        }
    }

    /// Record a committed mutation as a new frame, prune the window, and
    /// fan it out to every live subscriber without blocking on any of them.
    pub fn append(&self, tx_id: Id, tables: Vec<TableChange>) -> Arc<Frame> {
        let event_id = self.ids.next();
        let frame = Arc::new(Frame { event_id: event_id.clone(), tx_id, tables });

        let mut state = self.state.lock();
        state.frames.push_back(FrameEntry {
            event_id: event_id.clone(),
            frame: frame.clone(),
            appended_at_ms: now_millis(),
        });
        self.prune(&mut state);

        let mut dead = Vec::new();
        for (id, sender) in state.subscribers.iter() {
            if sender.try_send(frame.clone()).is_err() {
                dead.push(*id);
            }
        }
        for id in dead {
            state.subscribers.remove(&id);
            debug!(subscriber_id = id, "detached slow subscriber");
        }

        frame
    }

    fn prune(&self, state: &mut RingState) {
        let cutoff = now_millis().saturating_sub(self.config.buffer_ms);
        while let Some(front) = state.frames.front() {
            if front.appended_at_ms < cutoff || state.frames.len() > self.config.buffer_cap {
                state.frames.pop_front();
            } else {
                break;
            }
        }
    }

    /// Attach a new subscriber, atomically resolving its resume point
    /// against the current window so no frame is ever missed or repeated.
    pub fn attach(
        &self,
        last_event_id: Option<&Id>,
    ) -> (SubscriberId, Receiver<Arc<Frame>>, ReplayOutcome) {
        let mut state = self.state.lock();

        let outcome = match last_event_id {
            None => ReplayOutcome::NoReplay,
            Some(id) => match state.frames.iter().position(|entry| &entry.event_id == id) {
                Some(pos) => {
                    let suffix =
                        state.frames.iter().skip(pos + 1).map(|entry| entry.frame.clone()).collect();
                    ReplayOutcome::Suffix(suffix)
                }
                None => ReplayOutcome::Recover,
            },
        };

        let id = state.next_subscriber_id;
        state.next_subscriber_id += 1;
        let (tx, rx) = bounded(self.config.subscriber_capacity);
        state.subscribers.insert(id, tx);

        (id, rx, outcome)
    }

    pub fn detach(&self, id: SubscriberId) {
        self.state.lock().subscribers.remove(&id);
    }

    /// Number of currently attached subscribers, for metrics/introspection.
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().subscribers.len()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.state.lock().frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_change(name: &str) -> TableChange {
        TableChange { name: name.to_string(), pks: vec!["id".to_string()], row_versions: None, diffs: None }
    }

    fn tx_ids() -> IdGenerator {
        IdGenerator::new()
    }

    #[test]
    fn event_id_strictly_increases_across_appends() {
        let ring = EventRing::new(RingConfig::default());
        let txs = tx_ids();
        let a = ring.append(txs.next(), vec![table_change("t")]);
        let b = ring.append(txs.next(), vec![table_change("t")]);
        assert!(a.event_id < b.event_id);
    }

    #[test]
    fn ring_retains_at_most_buffer_cap_frames() {
        let ring = EventRing::new(RingConfig { buffer_ms: 60_000, buffer_cap: 3, subscriber_capacity: 16 });
        let txs = tx_ids();
        for _ in 0..10 {
            ring.append(txs.next(), vec![table_change("t")]);
        }
        assert_eq!(ring.len(), 3);
    }

    #[test]
    fn attach_without_last_event_id_has_no_replay() {
        let ring = EventRing::new(RingConfig::default());
        ring.append(tx_ids().next(), vec![table_change("t")]);

        let (_id, _rx, outcome) = ring.attach(None);
        assert!(matches!(outcome, ReplayOutcome::NoReplay));
    }

    #[test]
    fn attach_with_known_last_event_id_replays_suffix() {
        let ring = EventRing::new(RingConfig::default());
        let txs = tx_ids();
        let first = ring.append(txs.next(), vec![table_change("t")]);
        let second = ring.append(txs.next(), vec![table_change("t")]);

        let (_id, _rx, outcome) = ring.attach(Some(&first.event_id));
        match outcome {
            ReplayOutcome::Suffix(frames) => {
                assert_eq!(frames.len(), 1);
                assert_eq!(frames[0].event_id, second.event_id);
            }
            other => panic!("expected Suffix, got {other:?}"),
        }
    }

    #[test]
    fn attach_with_evicted_last_event_id_requires_recover() {
        let ring = EventRing::new(RingConfig { buffer_ms: 60_000, buffer_cap: 1, subscriber_capacity: 16 });
        let txs = tx_ids();
        let first = ring.append(txs.next(), vec![table_change("t")]);
        ring.append(txs.next(), vec![table_change("t")]);

        let (_id, _rx, outcome) = ring.attach(Some(&first.event_id));
        assert!(matches!(outcome, ReplayOutcome::Recover));
    }

    #[test]
    fn live_subscriber_receives_appended_frames() {
        let ring = EventRing::new(RingConfig::default());
        let (_id, rx, _outcome) = ring.attach(None);

        let frame = ring.append(tx_ids().next(), vec![table_change("t")]);
        let received = rx.try_recv().expect("frame should be delivered");
        assert_eq!(received.event_id, frame.event_id);
    }

    #[test]
    fn detach_removes_subscriber_from_fanout() {
        let ring = EventRing::new(RingConfig::default());
        let (id, rx, _outcome) = ring.attach(None);
        ring.detach(id);

        ring.append(tx_ids().next(), vec![table_change("t")]);
        assert!(rx.try_recv().is_err());
    }
}
