//! HTTP tests for the read routes and the error envelope.

mod common;

use axum::http::StatusCode;
use common::{UnavailableStore, app, body_bytes, body_json, get, ids, seeded_store};
use dealership_reviews_api::api::WELCOME;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Root and health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn root_returns_welcome_text() {
    let response = get(app(seeded_store().await), "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_bytes(response).await;
    assert_eq!(body, WELCOME.as_bytes());
    assert_eq!(body, "Welcome to the Mongoose API".as_bytes());
}

#[tokio::test]
async fn health_reports_collection_sizes() {
    let json = body_json(get(app(seeded_store().await), "/health").await).await;

    assert_eq!(json["status"], "healthy");
    assert_eq!(json["seeded"], true);
    assert_eq!(json["total_dealerships"], 3);
    assert_eq!(json["total_reviews"], 3);
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_reviews_returns_every_review() {
    let response = get(app(seeded_store().await), "/fetchReviews").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(ids(&json), vec![1, 2, 5]);
}

#[tokio::test]
async fn fetch_dealer_reviews_returns_matching_subset() {
    let json = body_json(get(app(seeded_store().await), "/fetchReviews/dealer/1").await).await;

    assert_eq!(ids(&json), vec![1, 5]);
    assert!(json.as_array().unwrap().iter().all(|r| r["dealership"] == 1));
}

#[tokio::test]
async fn fetch_dealer_reviews_without_matches_is_empty_not_error() {
    for uri in ["/fetchReviews/dealer/42", "/fetchReviews/dealer/abc", "/fetchReviews/dealer/01"] {
        let response = get(app(seeded_store().await), uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_eq!(body_json(response).await, serde_json::json!([]), "{uri}");
    }
}

// ---------------------------------------------------------------------------
// Dealerships
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_dealers_returns_every_dealership_with_details() {
    let json = body_json(get(app(seeded_store().await), "/fetchDealers").await).await;

    assert_eq!(ids(&json), vec![1, 2, 3]);
    assert_eq!(json[0]["full_name"], "Holdlamis Car Dealership");
}

#[tokio::test]
async fn fetch_dealers_by_state_is_case_sensitive() {
    let texas = body_json(get(app(seeded_store().await), "/fetchDealers/Texas").await).await;
    assert_eq!(ids(&texas), vec![1, 3]);

    let lower = body_json(get(app(seeded_store().await), "/fetchDealers/texas").await).await;
    assert_eq!(ids(&lower), Vec::<i64>::new());
}

#[tokio::test]
async fn fetch_dealer_returns_at_most_one() {
    let found = body_json(get(app(seeded_store().await), "/fetchDealer/2").await).await;
    assert_eq!(ids(&found), vec![2]);

    let missing = body_json(get(app(seeded_store().await), "/fetchDealer/99").await).await;
    assert_eq!(ids(&missing), Vec::<i64>::new());
}

#[tokio::test]
async fn fetch_dealer_parses_ids_leniently() {
    let prefix = body_json(get(app(seeded_store().await), "/fetchDealer/3xyz").await).await;
    assert_eq!(ids(&prefix), vec![3]);

    let response = get(app(seeded_store().await), "/fetchDealer/abc").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// Store failures map to 500 with the route's static message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_failures_use_route_specific_messages() {
    let cases = [
        ("/fetchReviews", "Error fetching documents"),
        ("/fetchReviews/dealer/1", "Error fetching documents"),
        ("/fetchDealers", "Error fetching dealerships"),
        ("/fetchDealers/Texas", "Error fetching dealerships by state"),
        ("/fetchDealer/1", "Error fetching dealerships by id"),
    ];

    for (uri, message) in cases {
        let response = get(app(Arc::new(UnavailableStore)), uri).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": message }),
            "{uri}"
        );
    }
}

#[tokio::test]
async fn health_survives_an_unavailable_store() {
    let response = get(app(Arc::new(UnavailableStore)), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["total_reviews"], 0);
}
