use crate::api::models::*;
use crate::models::Dealership;
use crate::storage::DocumentStore;
use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;

pub async fn fetch_dealers<S: DocumentStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Dealership>>, AppError> {
    let dealers = state
        .dealerships()
        .all()
        .await
        .map_err(AppError::internal("Error fetching dealerships"))?;

    info!(found = dealers.len(), "Fetched dealerships");
    Ok(Json(dealers))
}

pub async fn fetch_dealers_by_state<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Path(region): Path<String>,
) -> Result<Json<Vec<Dealership>>, AppError> {
    let dealers = state
        .dealerships()
        .by_state(&region)
        .await
        .map_err(AppError::internal("Error fetching dealerships by state"))?;

    info!(state = %region, found = dealers.len(), "Fetched dealerships by state");
    Ok(Json(dealers))
}

/// Unparseable ids match nothing rather than failing the request.
pub async fn fetch_dealer<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Vec<Dealership>>, AppError> {
    let Some(id) = parse_leading_int(&raw_id) else {
        info!(id = %raw_id, "Dealer id is not numeric");
        return Ok(Json(Vec::new()));
    };

    let dealers = state
        .dealerships()
        .by_id(id)
        .await
        .map_err(AppError::internal("Error fetching dealerships by id"))?;

    Ok(Json(dealers))
}

/// Base-10 integer prefix of `raw`: leading whitespace, an optional sign,
/// then digits up to the first non-digit. `"12abc"` is 12, `"abc"` is none.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let magnitude: i64 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
