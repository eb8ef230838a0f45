// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use serde::Serialize;

/// The flat, total error taxonomy (spec §7). Every surfaced failure carries
/// exactly one of these codes; there is no catch-all beyond `Internal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    NotFound,
    Conflict,
    Internal,
}

impl ErrorCode {
    pub fn http_status(self) -> u16 {
        match self {
            ErrorCode::BadRequest => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::Conflict => 409,
            ErrorCode::Internal => 500,
        }
    }
}

/// Structured context attached to `CONFLICT`/`NOT_FOUND` errors (spec §4.6,
/// §7). Every field is optional — only the fields relevant to the failure
/// are populated.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pk: Option<String>,
}

/// The one HTTP-facing error type. Internal crates may carry richer
/// `thiserror` enums of their own (see `cadence-storage::StorageError`) but
/// everything that reaches a client is flattened into this shape.
#[derive(Debug, Clone, thiserror::Error, Serialize)]
#[error("{message}")]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "requestId")]
    pub request_id: Option<String>,
}

impl Error {
    fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), details: None, request_id: None }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>, details: ErrorDetails) -> Self {
        Self::new(ErrorCode::Conflict, message).with_details(details)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    pub fn with_details(mut self, details: ErrorDetails) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_the_taxonomy() {
        assert_eq!(ErrorCode::BadRequest.http_status(), 400);
        assert_eq!(ErrorCode::NotFound.http_status(), 404);
        assert_eq!(ErrorCode::Conflict.http_status(), 409);
        assert_eq!(ErrorCode::Internal.http_status(), 500);
    }

    #[test]
    fn conflict_details_round_trip_through_json() {
        let err = Error::conflict(
            "version mismatch",
            ErrorDetails { expected_version: Some(1), actual_version: Some(2), ..Default::default() },
        );
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "CONFLICT");
        assert_eq!(json["details"]["expectedVersion"], 1);
        assert_eq!(json["details"]["actualVersion"], 2);
    }
}
