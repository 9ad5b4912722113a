pub mod dealer;
pub mod models;
pub mod review;

// Re-exports
pub use models::*;

use crate::storage::DocumentStore;
use axum::{Json, Router, extract::State, routing::get};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub const WELCOME: &str = "Welcome to the Mongoose API";

/// Build the full application router around `state`.
pub fn router<S: DocumentStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler::<S>))
        .merge(dealer::routes::<S>())
        .merge(review::routes::<S>())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

pub async fn root_handler() -> &'static str {
    WELCOME
}

pub async fn health_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
) -> Json<HealthResponse> {
    let total_dealerships = state.dealerships().all().await.map_or(0, |d| d.len());
    let total_reviews = state.reviews().all().await.map_or(0, |r| r.len());

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        seeded: state.is_seeded(),
        total_dealerships,
        total_reviews,
    })
}
