use crate::repository::{DealershipRepository, RepositoryError, ReviewRepository};
use crate::storage::DocumentStore;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::error;

/// Application state
pub struct AppState<S> {
    pub store: Arc<S>,
    seeded: Arc<AtomicBool>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            seeded: self.seeded.clone(),
        }
    }
}

impl<S: DocumentStore> AppState<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            seeded: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn dealerships(&self) -> DealershipRepository<S> {
        DealershipRepository::new(self.store.clone())
    }

    pub fn reviews(&self) -> ReviewRepository<S> {
        ReviewRepository::new(self.store.clone())
    }

    /// Record that startup seeding has finished, whatever its outcome
    pub fn mark_seeded(&self) {
        self.seeded.store(true, Ordering::Release);
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded.load(Ordering::Acquire)
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub seeded: bool,
    pub total_dealerships: usize,
    pub total_reviews: usize,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request itself is unusable; the message is shown to the caller.
    #[error("{0}")]
    BadRequest(String),

    /// The store failed; only the static message is shown to the caller.
    #[error("{message}: {source}")]
    Internal {
        message: &'static str,
        #[source]
        source: RepositoryError,
    },
}

impl AppError {
    /// `map_err` adapter tagging a repository failure with a route message.
    pub fn internal(message: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |source| AppError::Internal { message, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal { message, source } => {
                error!(error = %source, "{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
