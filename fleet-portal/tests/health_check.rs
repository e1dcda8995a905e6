mod common;

use axum::http::StatusCode;
use common::{assert_redirect, body_text, TestApp};

#[tokio::test]
async fn health_check_works() {
    let mut app = TestApp::spawn().await;

    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[tokio::test]
async fn pages_carry_request_id_and_security_headers() {
    let mut app = TestApp::spawn().await;

    let response = app.get("/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}

#[tokio::test]
async fn metrics_are_exposed() {
    portal_core::observability::init_metrics();
    let mut app = TestApp::spawn().await;

    let response = app.get("/metrics").await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_app_paths_go_to_login() {
    let mut app = TestApp::spawn().await;

    assert_redirect(&app.get("/app").await, "/login");
    assert_redirect(&app.get("/app/harbour").await, "/login");
    assert_eq!(app.get("/nowhere").await.status(), StatusCode::NOT_FOUND);
}
