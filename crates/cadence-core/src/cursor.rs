// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use cadence_type::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Asc,
    #[serde(rename = "desc")]
    Desc,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

impl Default for OrderBy {
    fn default() -> Self {
        Self { column: "updatedAt".to_string(), direction: SortDirection::Desc }
    }
}

/// The last row a client observed, used to resume a keyset scan strictly
/// after it (with `id ASC` as the permanent tiebreak, spec §4.4).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LastSeen {
    pub keys: IndexMap<String, Value>,
    pub id: String,
}

/// Opaque keyset-pagination cursor (spec §4.3): `{table, orderBy, last}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    pub table: String,
    pub order_by: OrderBy,
    pub last: LastSeen,
}

impl Cursor {
    pub fn encode(&self) -> String {
        let json = serde_json::to_vec(self).expect("Cursor is always serializable");
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decoding a malformed or truncated cursor is a soft error: spec §4.3
    /// says to treat it as "no cursor" rather than fail the request.
    pub fn decode(encoded: &str) -> Option<Cursor> {
        let bytes = URL_SAFE_NO_PAD.decode(encoded).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// A cursor issued under a different `orderBy` than the one the caller
    /// is now requesting falls back to resuming strictly after `last.id`
    /// by id ascending (spec §4.3).
    pub fn matches_order_by(&self, requested: &OrderBy) -> bool {
        &self.order_by == requested
    }
}
