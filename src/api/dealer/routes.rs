use crate::api::dealer::handlers::{fetch_dealer, fetch_dealers, fetch_dealers_by_state};
use crate::api::models::AppState;
use crate::storage::DocumentStore;
use axum::{Router, routing::get};

pub fn routes<S: DocumentStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/fetchDealers", get(fetch_dealers::<S>))
        .route("/fetchDealers/{state}", get(fetch_dealers_by_state::<S>))
        .route("/fetchDealer/{id}", get(fetch_dealer::<S>))
}
