//! Content store abstraction for Embalse.
//!
//! This crate defines the [`ContentStore`] trait — the hosted backend the site
//! talks to for table rows and uploaded files. It knows nothing about cards,
//! events, or sessions; rows are plain JSON objects and files are opaque bytes.
//!
//! Two implementations are provided:
//!
//! - [`RestStore`] — the hosted backend's REST dialect (table API + object storage)
//! - [`MemoryStore`] — in-memory, for tests and local development

mod error;
mod memory;
mod rest;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use rest::{RestStore, RestStoreConfig};

use serde_json::Value;

/// A row as exchanged with the store: a JSON object keyed by column name.
pub type Row = Value;

/// Sort direction for [`Query::order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// A table query: equality filters plus an optional ordering column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// `(column, value)` pairs, all of which must match.
    pub filters: Vec<(String, String)>,
    /// Column and direction to sort by.
    pub order: Option<(String, Direction)>,
}

impl Query {
    /// A query with no filters and no ordering.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Add an equality filter.
    #[must_use]
    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters.push((column.to_owned(), value.to_owned()));
        self
    }

    /// Order results by `column`.
    #[must_use]
    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some((column.to_owned(), direction));
        self
    }
}

/// A hosted content backend: relational-style tables plus object storage.
///
/// Every method is a single round trip; implementations do not retry.
/// Implementations must be safe to share across async tasks (`Send + Sync`).
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync + 'static {
    /// Select the rows of `table` matching `query`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend is unreachable or rejects the query.
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>, StoreError>;

    /// Insert a row and return it as stored, including store-assigned
    /// columns such as `id` and `created_at`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the insert fails.
    async fn insert(&self, table: &str, row: Row) -> Result<Row, StoreError>;

    /// Delete the row with the given `id`. Deleting a missing row is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend fails.
    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError>;

    /// Store `bytes` as object `name` in `bucket`. Existing objects are never
    /// overwritten.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the upload fails or the name is taken.
    async fn upload(
        &self,
        bucket: &str,
        name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<(), StoreError>;

    /// The public URL under which an uploaded object is served.
    fn public_url(&self, bucket: &str, name: &str) -> String;
}
