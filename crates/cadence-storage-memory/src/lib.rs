// Copyright (c) cadence.dev 2026
// This file is licensed under the Apache-2.0 license

//! An in-process, in-memory implementation of [`cadence_storage`]'s adapter
//! contract. Intended for tests and as the default backing of `bin/server`
//! — not a production storage engine (spec §1 explicitly leaves concrete
//! engines out of scope).

mod adapter;
mod table;

pub use adapter::MemoryAdapter;

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::cursor::OrderBy;
    use cadence_storage::{SelectWindow, StorageAdapter};
    use cadence_type::{PrimaryKey, Row, Value};

    fn row(id: &str, version: i64, updated_at: i64) -> Row {
        let mut row = Row::new();
        row.set("id", Value::Text(id.to_string()));
        row.set("version", Value::Int(version));
        row.set("updatedAt", Value::Int(updated_at));
        row
    }

    #[tokio::test]
    async fn insert_then_select_then_delete_round_trips() {
        let adapter = MemoryAdapter::new();
        let mut tx = adapter.begin().await.unwrap();
        tx.insert("items", row("i1", 1, 100)).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = adapter.begin().await.unwrap();
        let found = tx.select_by_pk("items", &PrimaryKey::scalar("i1")).await.unwrap();
        assert!(found.is_some());
        tx.delete_by_pk("items", &PrimaryKey::scalar("i1")).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = adapter.begin().await.unwrap();
        let gone = tx.select_by_pk("items", &PrimaryKey::scalar("i1")).await.unwrap();
        assert!(gone.is_none());
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn rollback_undoes_every_staged_write() {
        let adapter = MemoryAdapter::new();
        let mut tx = adapter.begin().await.unwrap();
        tx.insert("items", row("i1", 1, 100)).await.unwrap();
        tx.rollback().await.unwrap();

        let mut tx = adapter.begin().await.unwrap();
        let found = tx.select_by_pk("items", &PrimaryKey::scalar("i1")).await.unwrap();
        assert!(found.is_none());
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn select_window_orders_desc_then_paginates() {
        let adapter = MemoryAdapter::new();
        let mut tx = adapter.begin().await.unwrap();
        for (id, updated_at) in [("i1", 1), ("i2", 2), ("i3", 3), ("i4", 4), ("i5", 5)] {
            tx.insert("items", row(id, 1, updated_at)).await.unwrap();
        }
        tx.commit().await.unwrap();

        let mut tx = adapter.begin().await.unwrap();
        let order_by = OrderBy { column: "updatedAt".to_string(), direction: cadence_core::cursor::SortDirection::Desc };
        let first_page = tx
            .select_window("items", SelectWindow::new(order_by.clone()).with_limit(3))
            .await
            .unwrap();
        let ids: Vec<String> = first_page.data.iter().map(|r| r.get("id").unwrap().to_string()).collect();
        assert_eq!(ids, vec!["i5", "i4", "i3"]);
        assert!(first_page.next_cursor.is_some());

        let second_page = tx
            .select_window(
                "items",
                SelectWindow::new(order_by).with_limit(3).with_cursor(first_page.next_cursor),
            )
            .await
            .unwrap();
        let ids: Vec<String> = second_page.data.iter().map(|r| r.get("id").unwrap().to_string()).collect();
        assert_eq!(ids, vec!["i2", "i1"]);
        assert!(second_page.next_cursor.is_none());
        tx.commit().await.unwrap();
    }
}
