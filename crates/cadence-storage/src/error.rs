// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use cadence_core::{Error, ErrorDetails};

/// Failures an adapter may raise. Every variant already carries one of the
/// taxonomy codes from spec §4.4/§7 — the executor does not need to guess
/// what an adapter failure means, only translate it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StorageError {
    #[error("primary key collision on {pk}")]
    Conflict { pk: String, expected_version: Option<i64>, actual_version: Option<i64> },
    #[error("row not found: {pk}")]
    NotFound { pk: String },
    #[error("storage adapter error: {0}")]
    Internal(String),
}

impl StorageError {
    pub fn not_found(pk: impl Into<String>) -> Self {
        StorageError::NotFound { pk: pk.into() }
    }

    pub fn version_conflict(pk: impl Into<String>, expected: i64, actual: i64) -> Self {
        StorageError::Conflict {
            pk: pk.into(),
            expected_version: Some(expected),
            actual_version: Some(actual),
        }
    }

    pub fn pk_collision(pk: impl Into<String>) -> Self {
        StorageError::Conflict { pk: pk.into(), expected_version: None, actual_version: None }
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict { pk, expected_version, actual_version } => Error::conflict(
                err_message(&pk),
                ErrorDetails { pk: Some(pk), expected_version, actual_version, ..Default::default() },
            ),
            StorageError::NotFound { pk } => {
                Error::not_found(format!("row not found: {pk}"))
            }
            StorageError::Internal(message) => Error::internal(message),
        }
    }
}

fn err_message(pk: &str) -> String {
    format!("conflict on {pk}")
}
