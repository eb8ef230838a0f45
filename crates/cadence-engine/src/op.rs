// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

use cadence_type::{PrimaryKey, Row};

/// The five dispatched operations the executor accepts (spec §4.6). The
/// discriminant and per-op fields mirror the wire body's `op` field, but
/// this type is transport-agnostic — `cadence-http` builds one of these
/// from a parsed request.
pub enum Mutation {
    Insert {
        table: String,
        rows: Vec<Row>,
    },
    Update {
        table: String,
        pk: PrimaryKey,
        set: Row,
        if_version: Option<i64>,
    },
    Upsert {
        table: String,
        rows: Vec<Row>,
        /// `None` merges every input field except `id`/`updatedAt`/`version`
        /// into an existing row. `Some(&[])` means insert-only: finding an
        /// existing row is a conflict.
        merge: Option<Vec<String>>,
    },
    Delete {
        table: String,
        pk: PrimaryKey,
    },
}

impl Mutation {
    pub fn table(&self) -> &str {
        match self {
            Mutation::Insert { table, .. }
            | Mutation::Update { table, .. }
            | Mutation::Upsert { table, .. }
            | Mutation::Delete { table, .. } => table,
        }
    }
}
