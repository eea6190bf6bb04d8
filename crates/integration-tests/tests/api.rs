//! Router tests that run without a database.

#![allow(clippy::unwrap_used)]

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use tower::ServiceExt;

use bakeledger_integration_tests::offline_app;

async fn send(request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = offline_app().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json(body: &[u8]) -> serde_json::Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn test_check_auth_without_session() {
    let (status, body) = send(get("/api/check-auth")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), serde_json::json!({ "logged_in": false }));
}

#[tokio::test]
async fn test_data_routes_require_login() {
    for uri in [
        "/api/ingredients",
        "/api/ingredients/1",
        "/api/recipes",
        "/api/recipes/1",
        "/api/operational-costs",
        "/api/sales",
        "/api/reports?start=2024-03-01&end=2024-03-31",
        "/api/reports/print?start=2024-03-01&end=2024-03-31",
    ] {
        let (status, body) = send(get(uri)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(json(&body)["error"], "Authentication required", "{uri}");
    }
}

#[tokio::test]
async fn test_writes_require_login() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/sales")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"recipe_id": 1, "sale_date": "2024-03-01", "quantity_sold": 1}"#))
        .unwrap();
    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .method("DELETE")
        .uri("/api/ingredients/1")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_api_path_is_json_404() {
    let (status, body) = send(get("/api/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["error"], "No such endpoint");
}

#[tokio::test]
async fn test_malformed_login_body_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"username": "baker"}"#))
        .unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].is_string());
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let response = offline_app().oneshot(get("/health")).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
