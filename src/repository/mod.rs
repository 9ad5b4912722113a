pub mod dealerships;
pub mod reviews;

pub use dealerships::DealershipRepository;
pub use reviews::ReviewRepository;

use crate::storage::{Document, DocumentStore, StoreError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const DEALERSHIPS: &str = "dealerships";
pub const REVIEWS: &str = "reviews";

/// Data access error
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("stored document does not match its model: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("gave up assigning a review id after {attempts} conflicting attempts")]
    IdContention { attempts: usize },

    #[error("review id space exhausted after id {max}")]
    IdExhausted { max: i64 },
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Declare the logical `id` of both collections unique.
pub async fn ensure_indexes<S: DocumentStore>(store: &S) -> RepositoryResult<()> {
    store.create_unique_index(DEALERSHIPS, "id").await?;
    store.create_unique_index(REVIEWS, "id").await?;
    Ok(())
}

pub(crate) fn decode_all<T: DeserializeOwned>(
    documents: Vec<Document>,
) -> RepositoryResult<Vec<T>> {
    documents
        .into_iter()
        .map(|d| serde_json::from_value(Value::Object(d)).map_err(RepositoryError::from))
        .collect()
}

pub(crate) fn encode<T: Serialize>(model: &T) -> RepositoryResult<Document> {
    match serde_json::to_value(model)? {
        Value::Object(document) => Ok(document),
        other => Err(RepositoryError::Decode(serde::ser::Error::custom(format!(
            "expected a JSON object, got {other}"
        )))),
    }
}
