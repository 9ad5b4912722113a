use crate::api::models::AppState;
use crate::api::review::handlers::{fetch_dealer_reviews, fetch_reviews, insert_review};
use crate::storage::DocumentStore;
use axum::{
    Router,
    routing::{get, post},
};

pub fn routes<S: DocumentStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/fetchReviews", get(fetch_reviews::<S>))
        .route("/fetchReviews/dealer/{id}", get(fetch_dealer_reviews::<S>))
        .route("/insert_review", post(insert_review::<S>))
}
