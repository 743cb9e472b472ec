//! In-memory content store.
//!
//! Tables are vectors of JSON objects in insertion order and buckets are
//! maps of object name to bytes, all behind a `RwLock`. Nothing persists
//! when the process exits. Used by unit tests, the server's integration
//! tests, and local development without a hosted backend.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::{ContentStore, Direction, Query, Row, StoreError};

#[derive(Debug, Default)]
struct Tables {
    rows: HashMap<String, Vec<Map<String, Value>>>,
    objects: BTreeMap<(String, String), StoredObject>,
}

#[derive(Debug, Clone)]
struct StoredObject {
    content_type: String,
    bytes: Vec<u8>,
}

/// An in-memory [`ContentStore`].
///
/// Cloning is cheap and clones share state, so a test can keep a handle
/// while the application owns another.
///
/// # Examples
///
/// ```
/// # use embalse_store::{ContentStore, MemoryStore, Query};
/// # #[tokio::main]
/// # async fn main() {
/// let store = MemoryStore::new();
/// let row = store
///     .insert("events", serde_json::json!({ "title": "Taller" }))
///     .await
///     .unwrap();
/// assert!(row["id"].is_string());
/// let rows = store.select("events", &Query::all()).await.unwrap();
/// assert_eq!(rows.len(), 1);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    offline: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an unreachable backend: while offline, every operation
    /// fails with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, AtomicOrdering::SeqCst);
    }

    /// All rows of `table` in insertion order.
    pub async fn rows(&self, table: &str) -> Vec<Row> {
        let tables = self.tables.read().await;
        tables
            .rows
            .get(table)
            .map(|rows| rows.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default()
    }

    /// The bytes and content type of an uploaded object.
    pub async fn object(&self, bucket: &str, name: &str) -> Option<(String, Vec<u8>)> {
        let tables = self.tables.read().await;
        tables
            .objects
            .get(&(bucket.to_owned(), name.to_owned()))
            .map(|o| (o.content_type.clone(), o.bytes.clone()))
    }

    /// Names of all objects in `bucket`, sorted.
    pub async fn object_names(&self, bucket: &str) -> Vec<String> {
        let tables = self.tables.read().await;
        tables
            .objects
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, name)| name.clone())
            .collect()
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(AtomicOrdering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".to_owned()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ContentStore for MemoryStore {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>, StoreError> {
        self.ensure_online()?;
        let tables = self.tables.read().await;
        let mut rows: Vec<&Map<String, Value>> = tables
            .rows
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| {
                        query
                            .filters
                            .iter()
                            .all(|(col, expected)| column_text(row.get(col)) == *expected)
                    })
                    .collect()
            })
            .unwrap_or_default();

        if let Some((column, direction)) = &query.order {
            rows.sort_by(|a, b| {
                let ord = compare_values(a.get(column), b.get(column));
                match direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });
        }

        Ok(rows.into_iter().cloned().map(Value::Object).collect())
    }

    async fn insert(&self, table: &str, row: Row) -> Result<Row, StoreError> {
        self.ensure_online()?;
        let Value::Object(mut row) = row else {
            return Err(StoreError::Api {
                status: 400,
                message: "row must be a JSON object".to_owned(),
            });
        };

        row.entry("id")
            .or_insert_with(|| Value::String(uuid::Uuid::new_v4().to_string()));
        row.entry("created_at")
            .or_insert_with(|| Value::String(chrono::Utc::now().to_rfc3339()));

        let mut tables = self.tables.write().await;
        tables
            .rows
            .entry(table.to_owned())
            .or_default()
            .push(row.clone());
        Ok(Value::Object(row))
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        if let Some(rows) = tables.rows.get_mut(table) {
            rows.retain(|row| column_text(row.get("id")) != id);
        }
        Ok(())
    }

    async fn upload(
        &self,
        bucket: &str,
        name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<(), StoreError> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        let key = (bucket.to_owned(), name.to_owned());
        if tables.objects.contains_key(&key) {
            return Err(StoreError::ObjectExists {
                bucket: bucket.to_owned(),
                name: name.to_owned(),
            });
        }
        tables.objects.insert(
            key,
            StoredObject {
                content_type: content_type.to_owned(),
                bytes: bytes.to_vec(),
            },
        );
        Ok(())
    }

    fn public_url(&self, bucket: &str, name: &str) -> String {
        format!("memory://{bucket}/{}", urlencoding::encode(name))
    }
}

/// Text form of a column value, as the REST filter syntax compares it.
fn column_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "null".to_owned(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Ascending order with nulls last.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}
