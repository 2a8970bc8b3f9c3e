/// Health check tests
mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{body_string, create_test_app, Failure, StubGenreStore};
use std::sync::Arc;
use tower::util::ServiceExt;

#[tokio::test]
async fn test_healtz_returns_ok() {
    let app = create_test_app(Arc::new(StubGenreStore::new()));

    let response = app
        .oneshot(Request::builder().uri("/healtz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/plain; charset=utf-8"
    );
    assert_eq!(body_string(response).await, "OK");
}

/// Liveness does not depend on the datastore
#[tokio::test]
async fn test_healtz_ignores_store_failures() {
    let app = create_test_app(Arc::new(StubGenreStore::failing(Failure::Database)));

    let response = app
        .oneshot(Request::builder().uri("/healtz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = create_test_app(Arc::new(StubGenreStore::new()));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
