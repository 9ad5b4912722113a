#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use dealership_reviews_api::api::{self, AppState};
use dealership_reviews_api::repository::{self, DEALERSHIPS, REVIEWS};
use dealership_reviews_api::storage::{
    Document, DocumentStore, Filter, MemoryStore, Query, StoreError, StoreResult,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

pub fn doc(value: Value) -> Document {
    value.as_object().cloned().expect("fixture must be an object")
}

pub fn dealerships() -> Vec<Document> {
    vec![
        doc(json!({"id": 1, "state": "Texas", "city": "El Paso", "full_name": "Holdlamis Car Dealership"})),
        doc(json!({"id": 2, "state": "Kansas", "city": "Topeka", "full_name": "Temp Car Dealership"})),
        doc(json!({"id": 3, "state": "Texas", "city": "Austin", "full_name": "Sub-Ex Car Dealership"})),
    ]
}

pub fn reviews() -> Vec<Document> {
    vec![
        doc(json!({"id": 1, "name": "Berkly Shepley", "dealership": 1, "review": "Total grid-enabled service-desk",
                   "purchase": true, "purchase_date": "07/11/2020", "car_make": "Audi", "car_model": "A6", "car_year": 2010})),
        doc(json!({"id": 2, "name": "Gwenora Zettoi", "dealership": 2, "review": "Future-proofed foreground capability",
                   "purchase": true, "purchase_date": "09/17/2020", "car_make": "Pontiac", "car_model": "Firebird", "car_year": 1995})),
        doc(json!({"id": 5, "name": "Cal Wenzel", "dealership": 1, "review": "Ergonomic tangible moratorium",
                   "purchase": false})),
    ]
}

/// Indexed in-memory store holding the standard dealerships and reviews.
pub async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    repository::ensure_indexes(store.as_ref()).await.unwrap();
    store.insert_many(DEALERSHIPS, dealerships()).await.unwrap();
    store.insert_many(REVIEWS, reviews()).await.unwrap();
    store
}

pub fn app<S: DocumentStore>(store: Arc<S>) -> Router {
    let state = AppState::new(store);
    state.mark_seeded();
    api::router(state)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_raw(app: Router, uri: &str, body: impl Into<Body>) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(body.into())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Ids of a JSON array of documents, sorted.
pub fn ids(value: &Value) -> Vec<i64> {
    let mut ids: Vec<i64> = value
        .as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|d| d["id"].as_i64().expect("document without id"))
        .collect();
    ids.sort_unstable();
    ids
}

/// Store whose every operation fails, as an unreachable backend would.
pub struct UnavailableStore;

impl DocumentStore for UnavailableStore {
    async fn find(&self, _: &str, _: Query) -> StoreResult<Vec<Document>> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn insert_one(&self, _: &str, _: Document) -> StoreResult<()> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn insert_many(&self, _: &str, _: Vec<Document>) -> StoreResult<usize> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn delete_many(&self, _: &str, _: Filter) -> StoreResult<usize> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn create_unique_index(&self, _: &str, _: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn flush(&self) -> StoreResult<()> {
        Ok(())
    }
}
