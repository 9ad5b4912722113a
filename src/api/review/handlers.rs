use crate::api::models::*;
use crate::models::{NewReview, Review};
use crate::storage::DocumentStore;
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use tracing::info;

pub async fn fetch_reviews<S: DocumentStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Review>>, AppError> {
    let reviews = state
        .reviews()
        .all()
        .await
        .map_err(AppError::internal("Error fetching documents"))?;

    Ok(Json(reviews))
}

/// The dealer id is compared as given, without numeric coercion.
pub async fn fetch_dealer_reviews<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Path(dealer): Path<String>,
) -> Result<Json<Vec<Review>>, AppError> {
    let reviews = state
        .reviews()
        .by_dealer(&dealer)
        .await
        .map_err(AppError::internal("Error fetching documents"))?;

    info!(dealer = %dealer, found = reviews.len(), "Fetched dealer reviews");
    Ok(Json(reviews))
}

/// Accepts a raw JSON body regardless of content type.
pub async fn insert_review<S: DocumentStore>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Result<Json<Review>, AppError> {
    // Validate
    let submission: NewReview = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid review payload: {e}")))?;
    submission.validate().map_err(AppError::BadRequest)?;

    info!(dealership = submission.dealership, "Inserting review");

    let review = state
        .reviews()
        .insert(submission)
        .await
        .map_err(AppError::internal("Error inserting review"))?;

    info!(id = review.id, "Review added");
    Ok(Json(review))
}
