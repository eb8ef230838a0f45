// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use crate::error::ApiError;
use crate::state::AppState;
use crate::wire::{parse_order_by, MutateRequest, MutatorRequest, SelectRequest, SelectResponse};
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use cadence_core::cursor::{Cursor, OrderBy};
use cadence_core::Error;
use cadence_engine::{resolve_idempotency_key, CallerContext};
use cadence_storage::SelectWindow;
use serde_json::Value as Json2;

const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

pub async fn mutate_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<MutateRequest>,
) -> Result<Json<Json2>, ApiError> {
    let idempotency_key =
        resolve_idempotency_key(header_str(&headers, IDEMPOTENCY_KEY_HEADER), body.client_op_id.as_deref());
    let mutation = body.into_mutation().map_err(ApiError::from)?;
    let (response, _duplicated) = state.executor.execute(mutation, idempotency_key).await.map_err(ApiError::from)?;
    Ok(Json(response))
}

pub async fn select_handler(
    State(state): State<AppState>,
    Json(body): Json<SelectRequest>,
) -> Result<Json<SelectResponse>, ApiError> {
    let order_by = match &body.order_by {
        Some(value) => parse_order_by(value)?,
        None => OrderBy::default(),
    };

    let cursor = body.cursor.as_deref().and_then(Cursor::decode).filter(|c| c.table == body.table);

    let mut window = SelectWindow::new(order_by).with_cursor(cursor);
    if let Some(limit) = body.limit {
        window = window.with_limit(limit);
    }
    window.select = body.select;

    let mut tx = state.adapter.begin().await.map_err(Error::from)?;
    let page = tx.select_window(&body.table, window).await.map_err(Error::from)?;
    tx.commit().await.map_err(Error::from)?;

    Ok(Json(SelectResponse { data: page.data, next_cursor: page.next_cursor.map(|c| c.encode()) }))
}

pub async fn mutators_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
    Json(body): Json<MutatorRequest>,
) -> Result<Json<Json2>, ApiError> {
    let idempotency_key =
        resolve_idempotency_key(header_str(&headers, IDEMPOTENCY_KEY_HEADER), body.client_op_id.as_deref());
    let ctx = CallerContext::default();
    let (response, _duplicated) =
        state.mutator_runner.run(&name, body.args, ctx, idempotency_key).await.map_err(ApiError::from)?;
    Ok(Json(response))
}
