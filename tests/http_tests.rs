//! HTTP API Tests
//!
//! Exercise the router end-to-end with in-process requests, verifying
//! the verb-to-status mappings and Location headers.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use epochkv::http::router;
use epochkv::{Engine, Record};
use tempfile::TempDir;
use tower::ServiceExt;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_app() -> (TempDir, Router) {
    let temp_dir = TempDir::new().unwrap();
    let engine = Arc::new(Engine::open_path(temp_dir.path()).unwrap());
    (temp_dir, router(engine))
}

fn get_request(key: &str, timestamp: i64) -> Request<Body> {
    Request::builder()
        .uri(format!("/records?key={}&timestamp={}", key, timestamp))
        .body(Body::empty())
        .unwrap()
}

fn delete_request(key: &str, timestamp: i64) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(format!("/records?key={}&timestamp={}", key, timestamp))
        .body(Body::empty())
        .unwrap()
}

fn record_request(method: &str, record: &Record) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri("/records")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(record).unwrap()))
        .unwrap()
}

async fn body_record(response: axum::response::Response) -> Record {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// GET Tests
// =============================================================================

#[tokio::test]
async fn test_get_missing_returns_404() {
    let (_temp, app) = setup_app();

    let response = app.oneshot(get_request("sensor-1", 1000)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_returns_record_json() {
    let (_temp, app) = setup_app();
    let record = Record::new("sensor-1", 1000, "42");

    app.clone()
        .oneshot(record_request("POST", &record))
        .await
        .unwrap();

    let response = app.oneshot(get_request("sensor-1", 1000)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_record(response).await, record);
}

#[tokio::test]
async fn test_get_rejects_non_numeric_timestamp() {
    let (_temp, app) = setup_app();

    let request = Request::builder()
        .uri("/records?key=a&timestamp=soon")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// POST Tests
// =============================================================================

#[tokio::test]
async fn test_post_creates_with_location() {
    let (_temp, app) = setup_app();
    let record = Record::new("sensor-1", 1000, "42");

    let response = app.oneshot(record_request("POST", &record)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/records?key=sensor-1&timestamp=1000"
    );
    assert_eq!(body_record(response).await, record);
}

#[tokio::test]
async fn test_post_existing_returns_409() {
    let (_temp, app) = setup_app();
    let record = Record::new("sensor-1", 1000, "42");

    app.clone()
        .oneshot(record_request("POST", &record))
        .await
        .unwrap();
    let response = app.oneshot(record_request("POST", &record)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// =============================================================================
// PUT Tests
// =============================================================================

#[tokio::test]
async fn test_put_new_identity_returns_201() {
    let (_temp, app) = setup_app();
    let record = Record::new("sensor-1", 1000, "42");

    let response = app.oneshot(record_request("PUT", &record)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/records?key=sensor-1&timestamp=1000"
    );
}

#[tokio::test]
async fn test_put_existing_identity_returns_200() {
    let (_temp, app) = setup_app();

    app.clone()
        .oneshot(record_request("POST", &Record::new("sensor-1", 1000, "old")))
        .await
        .unwrap();

    let replacement = Record::new("sensor-1", 1000, "new");
    let response = app
        .clone()
        .oneshot(record_request("PUT", &replacement))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_record(response).await, replacement);

    // The replacement is what a subsequent GET observes
    let response = app.oneshot(get_request("sensor-1", 1000)).await.unwrap();
    assert_eq!(body_record(response).await.value, "new");
}

// =============================================================================
// DELETE Tests
// =============================================================================

#[tokio::test]
async fn test_delete_then_get_returns_404() {
    let (_temp, app) = setup_app();

    app.clone()
        .oneshot(record_request("POST", &Record::new("sensor-1", 1000, "42")))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(delete_request("sensor-1", 1000))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_request("sensor-1", 1000)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_missing_returns_404() {
    let (_temp, app) = setup_app();

    let response = app.oneshot(delete_request("ghost", 1)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
