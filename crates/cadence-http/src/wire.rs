// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use cadence_core::cursor::{OrderBy, SortDirection};
use cadence_core::Error;
use cadence_engine::Mutation;
use cadence_type::{PrimaryKey, Row};
use serde::{Deserialize, Serialize};

/// Body of `POST /mutate` (spec §6). All four ops share one shape; fields
/// irrelevant to a given `op` are simply left absent.
#[derive(Deserialize)]
pub struct MutateRequest {
    pub op: String,
    pub table: String,
    #[serde(default)]
    pub row: Option<Row>,
    #[serde(default)]
    pub rows: Option<Vec<Row>>,
    #[serde(default)]
    pub pk: Option<PrimaryKey>,
    #[serde(default)]
    pub set: Option<Row>,
    #[serde(default, rename = "ifVersion")]
    pub if_version: Option<i64>,
    #[serde(default)]
    pub merge: Option<Vec<String>>,
    #[serde(default, rename = "clientOpId")]
    pub client_op_id: Option<String>,
}

impl MutateRequest {
    pub fn into_mutation(self) -> Result<Mutation, Error> {
        match self.op.as_str() {
            "insert" => Ok(Mutation::Insert {
                table: self.table,
                rows: batch_rows(self.rows, self.row)?,
            }),
            "update" => Ok(Mutation::Update {
                table: self.table,
                pk: self.pk.ok_or_else(|| Error::bad_request("update requires pk"))?,
                set: self.set.ok_or_else(|| Error::bad_request("update requires set"))?,
                if_version: self.if_version,
            }),
            "upsert" => Ok(Mutation::Upsert {
                table: self.table,
                rows: batch_rows(self.rows, self.row)?,
                merge: self.merge,
            }),
            "delete" => Ok(Mutation::Delete {
                table: self.table,
                pk: self.pk.ok_or_else(|| Error::bad_request("delete requires pk"))?,
            }),
            other => Err(Error::bad_request(format!("unknown op: {other}"))),
        }
    }
}

fn batch_rows(rows: Option<Vec<Row>>, row: Option<Row>) -> Result<Vec<Row>, Error> {
    match (rows, row) {
        (Some(rows), _) => Ok(rows),
        (None, Some(row)) => Ok(vec![row]),
        (None, None) => Err(Error::bad_request("insert/upsert requires `row` or `rows`")),
    }
}

/// Body of `POST /mutators/:name` (spec §6).
#[derive(Deserialize)]
pub struct MutatorRequest {
    #[serde(default)]
    pub args: serde_json::Value,
    #[serde(default, rename = "clientOpId")]
    pub client_op_id: Option<String>,
}

/// Body of `POST /select` (spec §6). `where` is accepted but never
/// interpreted server-side — filtering is a client concern.
#[derive(Deserialize)]
pub struct SelectRequest {
    pub table: String,
    #[serde(default)]
    pub select: Option<Vec<String>>,
    #[serde(default, rename = "orderBy")]
    pub order_by: Option<serde_json::Value>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default, rename = "where")]
    pub _where: Option<serde_json::Value>,
}

/// `orderBy` arrives as a single-entry object, `{"updatedAt": "desc"}`, not
/// the `{column, direction}` shape used internally by the cursor codec.
pub fn parse_order_by(value: &serde_json::Value) -> Result<OrderBy, Error> {
    let obj = value.as_object().ok_or_else(|| Error::bad_request("orderBy must be an object"))?;
    let (column, direction) = obj
        .iter()
        .next()
        .ok_or_else(|| Error::bad_request("orderBy must have exactly one entry"))?;
    let direction = match direction.as_str() {
        Some("asc") => SortDirection::Asc,
        Some("desc") => SortDirection::Desc,
        _ => return Err(Error::bad_request("orderBy direction must be \"asc\" or \"desc\"")),
    };
    Ok(OrderBy { column: column.clone(), direction })
}

#[derive(Serialize)]
pub struct SelectResponse {
    pub data: Vec<Row>,
    #[serde(rename = "nextCursor")]
    pub next_cursor: Option<String>,
}

/// Query parameters on `GET /events` (spec §6).
#[derive(Deserialize, Default)]
pub struct EventsQuery {
    pub since: Option<String>,
}
