use super::{REVIEWS, RepositoryError, RepositoryResult, decode_all, encode};
use crate::models::{NewReview, Review};
use crate::storage::{DocumentStore, Filter, Query, SortDirection, StoreError};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Attempts at `max(id) + 1` before giving up under contention.
pub const MAX_ID_ATTEMPTS: usize = 8;

/// Access to the `reviews` collection
pub struct ReviewRepository<S> {
    store: Arc<S>,
}

impl<S: DocumentStore> ReviewRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn all(&self) -> RepositoryResult<Vec<Review>> {
        let documents = self.store.find(REVIEWS, Query::all()).await?;
        decode_all(documents)
    }

    /// Reviews whose `dealership` renders exactly as `dealer`
    pub async fn by_dealer(&self, dealer: &str) -> RepositoryResult<Vec<Review>> {
        let documents = self
            .store
            .find(REVIEWS, Query::filter(Filter::text("dealership", dealer)))
            .await?;
        decode_all(documents)
    }

    /// Highest assigned id, or `None` when there are no reviews.
    ///
    /// Only the `id` of the top document is read; its other fields may be
    /// in any shape.
    pub async fn max_id(&self) -> RepositoryResult<Option<i64>> {
        let query = Query::all()
            .sort_by("id", SortDirection::Descending)
            .limit(1);
        let top = self.store.find(REVIEWS, query).await?;
        Ok(top
            .first()
            .and_then(|document| document.get("id"))
            .and_then(Value::as_i64))
    }

    /// Store `new` under the next free id.
    ///
    /// The id is `max(id) + 1`, or 1 for an empty collection. Concurrent
    /// writers may read the same maximum; the unique index on `id` lets only
    /// one of them commit, and the others re-read and try again.
    pub async fn insert(&self, new: NewReview) -> RepositoryResult<Review> {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let id = match self.max_id().await? {
                Some(max) => max
                    .checked_add(1)
                    .ok_or(RepositoryError::IdExhausted { max })?,
                None => 1,
            };
            let review = new.clone().with_id(id);

            match self.store.insert_one(REVIEWS, encode(&review)?).await {
                Ok(()) => {
                    debug!(id, attempt, "Review stored");
                    return Ok(review);
                }
                Err(StoreError::DuplicateKey { .. }) => {
                    warn!(id, attempt, "Review id taken by a concurrent insert, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(RepositoryError::IdContention {
            attempts: MAX_ID_ATTEMPTS,
        })
    }
}
