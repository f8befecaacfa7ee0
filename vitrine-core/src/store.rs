use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// A row is a flat mapping of column name to scalar value.
pub type Row = Map<String, Value>;

/// Ordering requested by a named column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

impl Order {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }
}

/// Parameters for `select`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub order: Option<Order>,
    /// Equality filters, all of which must match.
    pub filters: Vec<(String, Value)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_by(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// True when every filter matches the row.
    pub fn matches(&self, row: &Row) -> bool {
        self.filters
            .iter()
            .all(|(column, expected)| row.get(column) == Some(expected))
    }
}

/// The hosted row store, treated as an opaque service.
///
/// - `select` → rows of a table, filtered and ordered
/// - `insert` → one new row, returned as stored (with generated columns)
/// - `update` → merge columns into the row keyed by `id`
/// - `delete` → remove the row keyed by `id`
/// - `count`  → number of rows without fetching them
///
/// Failures come back as `anyhow::Error`, usually carrying a
/// [`VitrineError`](crate::VitrineError).
#[async_trait]
pub trait RowStore: Send + Sync {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>>;

    async fn insert(&self, table: &str, row: Row) -> Result<Row>;

    async fn update(&self, table: &str, id: &str, row: Row) -> Result<Row>;

    async fn delete(&self, table: &str, id: &str) -> Result<()>;

    async fn count(&self, table: &str) -> Result<u64>;
}
