// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use crate::state::AppState;
use crate::wire::EventsQuery;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use cadence_cdc::Frame;
use cadence_core::Id;
use cadence_subscription::{Heartbeat, Resume, Session};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt as _;
use tracing::debug;

const LAST_EVENT_ID_HEADER: &str = "last-event-id";
const CHANGE_EVENT_STREAM_CAPACITY: usize = 32;

/// `GET /events`: a hand-framed SSE stream of committed [`Frame`]s (spec §6).
/// `Last-Event-ID` (header) takes precedence over `since` (query) for
/// resuming — the same header browsers themselves set on reconnect.
pub async fn events_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<EventsQuery>,
) -> Response {
    let last_event_id = header_last_event_id(&headers).or_else(|| query.since.as_deref().and_then(Id::from_generated));

    let mut session = Session::attach(&state.ring, last_event_id.as_ref());
    state.session_registry.record_attach(session.id());

    let (tx, rx) = mpsc::channel::<String>(CHANGE_EVENT_STREAM_CAPACITY);
    let keepalive_ms = state.keepalive_ms;
    let registry = state.session_registry.clone();

    tokio::spawn(async move {
        let session_id = session.id();
        match session.take_resume() {
            Resume::None => {}
            Resume::Suffix(frames) => {
                for frame in frames {
                    if tx.send(frame_event(&frame)).await.is_err() {
                        registry.record_detach(session_id);
                        return;
                    }
                }
            }
            Resume::Recover => {
                if tx.send(recover_event()).await.is_err() {
                    registry.record_detach(session_id);
                    return;
                }
            }
        }

        let mut heartbeat = Heartbeat::new(Duration::from_millis(keepalive_ms));
        loop {
            tokio::select! {
                frame = session.recv() => {
                    match frame {
                        Some(frame) => {
                            if tx.send(frame_event(&frame)).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                _ = heartbeat.tick() => {
                    if tx.send(":keepalive\n\n".to_string()).await.is_err() {
                        break;
                    }
                }
            }
        }
        debug!(subscriber_id = session_id, "event stream closed");
        registry.record_detach(session_id);
    });

    let stream = ReceiverStream::new(rx).map(|chunk| Ok::<_, std::io::Error>(chunk.into_bytes()));
    let body = Body::from_stream(stream);

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        body,
    )
        .into_response()
}

fn header_last_event_id(headers: &HeaderMap) -> Option<Id> {
    headers.get(LAST_EVENT_ID_HEADER).and_then(|v| v.to_str().ok()).and_then(Id::from_generated)
}

fn frame_event(frame: &Arc<Frame>) -> String {
    format!("id: {}\nevent: mutation\ndata: {}\n\n", frame.event_id, frame.to_json())
}

fn recover_event() -> String {
    "event: recover\ndata: {}\n\n".to_string()
}
