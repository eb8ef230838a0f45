// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

//! The HTTP transport: `/mutate`, `/select`, `/mutators/{name}`, `/events`
//! (spec §6). Wire parsing lives in [`wire`]; everything here does is
//! extract, call into `cadence-engine`/`cadence-storage`, and translate the
//! result back into JSON or an SSE stream.

mod error;
mod events;
mod handlers;
mod state;
mod wire;

pub use error::ApiError;
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use std::time::Duration;
use tower_http::trace::TraceLayer;

/// The default per-request timeout for `/mutate`, `/select`, and
/// `/mutators/{name}`. `/events` is long-lived and exempt — it is mounted
/// outside this layer.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/mutate", post(handlers::mutate_handler))
        .route("/select", post(handlers::select_handler))
        .route("/mutators/{name}", post(handlers::mutators_handler))
        .layer(tower_http::timeout::TimeoutLayer::new(REQUEST_TIMEOUT));

    Router::new()
        .merge(api)
        .route("/events", get(events::events_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
