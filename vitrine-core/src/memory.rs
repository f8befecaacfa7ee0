use std::cmp::Ordering;
use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::VitrineError;
use crate::store::{Query, Row, RowStore};

/// In-memory row store for tests, demos and local development.
///
/// Mimics the hosted store's defaults: `id` (uuid v4) and `created_at`
/// (RFC 3339) are generated on insert when the caller leaves them out.
#[derive(Default)]
pub struct MemoryRowStore {
    tables: RwLock<HashMap<String, Vec<Row>>>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table directly, bypassing id/timestamp generation.
    pub async fn seed(&self, table: &str, rows: Vec<Row>) {
        let mut tables = self.tables.write().await;
        tables.entry(table.to_string()).or_default().extend(rows);
    }

    fn not_found(table: &str, id: &str) -> anyhow::Error {
        VitrineError::not_found(format!("{table}: no row with id {id}")).into_anyhow()
    }

    fn row_id(row: &Row) -> Option<&str> {
        row.get("id").and_then(|v| v.as_str())
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        // missing / null sort first
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

#[async_trait]
impl RowStore for MemoryRowStore {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Row> = tables
            .get(table)
            .into_iter()
            .flatten()
            .filter(|row| query.matches(row))
            .cloned()
            .collect();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ord = compare_values(a.get(&order.column), b.get(&order.column));
                if order.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        tracing::debug!(table, rows = rows.len(), "memory select");
        Ok(rows)
    }

    async fn insert(&self, table: &str, mut row: Row) -> Result<Row> {
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();

        let id = match Self::row_id(&row) {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };
        if rows.iter().any(|r| Self::row_id(r) == Some(id.as_str())) {
            return Err(VitrineError::conflict(format!("{table}: duplicate id {id}")).into_anyhow());
        }

        row.insert("id".to_string(), Value::String(id));
        if !row.contains_key("created_at") {
            row.insert(
                "created_at".to_string(),
                Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }

        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: &str, id: &str, row: Row) -> Result<Row> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|r| Self::row_id(r) == Some(id)))
            .ok_or_else(|| Self::not_found(table, id))?;

        for (column, value) in row {
            if column == "id" {
                continue;
            }
            existing.insert(column, value);
        }

        Ok(existing.clone())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| Self::not_found(table, id))?;

        let before = rows.len();
        rows.retain(|r| Self::row_id(r) != Some(id));
        if rows.len() == before {
            return Err(Self::not_found(table, id));
        }
        Ok(())
    }

    async fn count(&self, table: &str) -> Result<u64> {
        let tables = self.tables.read().await;
        Ok(tables.get(table).map_or(0, |rows| rows.len() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Order;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn insert_generates_id_and_timestamp() {
        let store = MemoryRowStore::new();
        let stored = store
            .insert("media", row(json!({"title": "Open day"})))
            .await
            .unwrap();

        assert!(stored.get("id").and_then(|v| v.as_str()).is_some());
        assert!(stored.contains_key("created_at"));
        assert_eq!(store.count("media").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn select_orders_descending() {
        let store = MemoryRowStore::new();
        store
            .seed(
                "documents",
                vec![
                    row(json!({"id": "a", "created_at": "2024-01-01T00:00:00Z"})),
                    row(json!({"id": "b", "created_at": "2024-03-01T00:00:00Z"})),
                    row(json!({"id": "c", "created_at": "2024-02-01T00:00:00Z"})),
                ],
            )
            .await;

        let rows = store
            .select("documents", &Query::new().order_by(Order::desc("created_at")))
            .await
            .unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[tokio::test]
    async fn update_merges_and_keeps_id() {
        let store = MemoryRowStore::new();
        store
            .seed("media", vec![row(json!({"id": "m1", "title": "Old", "category": "news"}))])
            .await;

        let updated = store
            .update("media", "m1", row(json!({"id": "other", "title": "New"})))
            .await
            .unwrap();
        assert_eq!(updated["id"], "m1");
        assert_eq!(updated["title"], "New");
        assert_eq!(updated["category"], "news");
    }

    #[tokio::test]
    async fn delete_missing_row_is_not_found() {
        let store = MemoryRowStore::new();
        let err = store.delete("media", "nope").await.unwrap_err();
        let v = VitrineError::from_anyhow(&err).unwrap();
        assert_eq!(v.kind, crate::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn filters_and_limit_apply() {
        let store = MemoryRowStore::new();
        store
            .seed(
                "contacts",
                vec![
                    row(json!({"id": "1", "read": false})),
                    row(json!({"id": "2", "read": true})),
                    row(json!({"id": "3", "read": false})),
                ],
            )
            .await;

        let unread = store
            .select("contacts", &Query::new().eq("read", false).limit(1))
            .await
            .unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0]["id"], "1");
    }
}
