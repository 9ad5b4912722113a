pub mod jsonl;
pub mod memory;
pub mod query;

pub use memory::MemoryStore;
pub use query::{Condition, Filter, Query, Sort, SortDirection};

use serde_json::{Map, Value};
use std::future::Future;

/// A schema-free record as held by the store.
pub type Document = Map<String, Value>;

/// Storage error
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate key in {collection}.{field}: {value}")]
    DuplicateKey {
        collection: String,
        field: String,
        value: Value,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Document store operations the service depends on.
///
/// Implementations must be thread-safe; every call may suspend.
pub trait DocumentStore: Send + Sync + 'static {
    /// Return all documents of `collection` matching `query`, in query order.
    fn find(
        &self,
        collection: &str,
        query: Query,
    ) -> impl Future<Output = StoreResult<Vec<Document>>> + Send;

    /// Insert a single document. Fails with `DuplicateKey` on a unique index hit.
    fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    /// Insert all documents or none of them. Returns the inserted count.
    fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> impl Future<Output = StoreResult<usize>> + Send;

    /// Delete every document matching `filter`. Returns the deleted count.
    fn delete_many(
        &self,
        collection: &str,
        filter: Filter,
    ) -> impl Future<Output = StoreResult<usize>> + Send;

    /// Declare `field` unique within `collection`.
    fn create_unique_index(
        &self,
        collection: &str,
        field: &str,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    /// Persist pending state, if the implementation persists at all.
    fn flush(&self) -> impl Future<Output = StoreResult<()>> + Send;
}
