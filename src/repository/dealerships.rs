use super::{DEALERSHIPS, RepositoryResult, decode_all};
use crate::models::Dealership;
use crate::storage::{DocumentStore, Filter, Query};
use std::sync::Arc;

/// Read access to the `dealerships` collection
pub struct DealershipRepository<S> {
    store: Arc<S>,
}

impl<S: DocumentStore> DealershipRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn all(&self) -> RepositoryResult<Vec<Dealership>> {
        self.find(Filter::all()).await
    }

    /// Exact, case-sensitive match on `state`
    pub async fn by_state(&self, state: &str) -> RepositoryResult<Vec<Dealership>> {
        self.find(Filter::equals("state", state)).await
    }

    /// At most one dealership, given the unique index on `id`
    pub async fn by_id(&self, id: i64) -> RepositoryResult<Vec<Dealership>> {
        self.find(Filter::equals("id", id)).await
    }

    async fn find(&self, filter: Filter) -> RepositoryResult<Vec<Dealership>> {
        let documents = self.store.find(DEALERSHIPS, Query::filter(filter)).await?;
        decode_all(documents)
    }
}
