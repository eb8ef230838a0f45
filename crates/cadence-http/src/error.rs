// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cadence_core::Error;

/// Renders a [`Error`] as the JSON envelope clients parse (spec §7):
/// `{code, message, details?, requestId?}` over the matching status code.
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0)).into_response()
    }
}
