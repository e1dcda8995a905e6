mod common;

use axum::http::StatusCode;
use common::{assert_redirect, body_text, TestApp};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn anonymous_visits_to_protected_screens_go_to_login() {
    let mut app = TestApp::spawn().await;

    for uri in [
        "/app/operator",
        "/app/operator/ships",
        "/app/operator/reports?status=new",
        "/app/captain",
        "/app/captain/spots",
    ] {
        assert_redirect(&app.get(uri).await, "/login");
    }
}

#[tokio::test]
async fn captain_sign_in_lands_on_captain_dashboard() {
    let mut app = TestApp::spawn().await;

    let response = app.sign_in_as("captain", 7, "T1").await;
    assert_redirect(&response, "/app/captain");

    for endpoint in ["/captain/routes/", "/captain/fishing_spots/", "/reports"] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .and(header("authorization", "Bearer T1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&app.api)
            .await;
    }

    let response = app.get("/app/captain").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No active route"));
}

#[tokio::test]
async fn captain_is_kept_out_of_operator_screens() {
    let mut app = TestApp::spawn().await;
    app.sign_in_as("captain", 7, "T1").await;

    assert_redirect(&app.get("/app/operator/ships").await, "/login");
    // The login page forwards a signed-in browser to its own landing page.
    assert_redirect(&app.get("/login").await, "/app/captain");
}

#[tokio::test]
async fn failed_sign_in_stays_on_login_page() {
    let mut app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(serde_json::json!({"detail": "Incorrect username or password"})),
        )
        .mount(&app.api)
        .await;

    let response = app.post_form("/login", "email=a%40b.com&password=wrong").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Invalid email or password"));
    assert_redirect(&app.get("/app/captain").await, "/login");
}

#[tokio::test]
async fn unauthorized_api_response_signs_the_browser_out() {
    let mut app = TestApp::spawn().await;
    app.sign_in_as("captain", 7, "T1").await;

    Mock::given(method("GET"))
        .and(path("/captain/routes/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.api)
        .await;

    assert_redirect(&app.get("/app/captain/routes").await, "/login");
    // Stored credentials are gone, so the next protected navigation is refused too.
    assert_redirect(&app.get("/app/captain/spots").await, "/login");
    assert_eq!(app.get("/login").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn logout_clears_the_session() {
    let mut app = TestApp::spawn().await;
    app.sign_in_as("operator", 2, "OP").await;

    assert_redirect(&app.post_form("/logout", "").await, "/");
    assert_redirect(&app.get("/app/operator").await, "/login");
}
