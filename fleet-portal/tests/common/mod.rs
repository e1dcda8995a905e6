//! Test helpers for fleet-portal integration tests.
//!
//! Drives the full router in-process against a wiremock stand-in for the
//! fleet REST API, carrying the session cookie between requests like a browser.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use fleet_portal::{
    api::FleetApi,
    config::{FleetApiSettings, SessionSettings},
    startup::build_router,
    AppState,
};
use std::sync::Arc;
use tower::util::ServiceExt;
use wiremock::matchers::{header as header_eq, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestApp {
    pub router: Router,
    pub api: MockServer,
    cookie: Option<String>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let api = MockServer::start().await;
        let client = FleetApi::new(&FleetApiSettings {
            base_url: api.uri(),
            request_timeout_secs: Some(5),
            user_agent: "fleet-portal-test".to_string(),
        })
        .expect("Failed to build fleet API client");

        let router = build_router(AppState::new(Arc::new(client)), &SessionSettings::default());

        Self {
            router,
            api,
            cookie: None,
        }
    }

    pub async fn get(&mut self, uri: &str) -> Response<Body> {
        let request = Request::builder().uri(uri);
        self.send(request, Body::empty()).await
    }

    pub async fn post_form(&mut self, uri: &str, form: &str) -> Response<Body> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(request, Body::from(form.to_string())).await
    }

    async fn send(&mut self, mut request: axum::http::request::Builder, body: Body) -> Response<Body> {
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie.as_str());
        }

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie
                .to_str()
                .unwrap()
                .split(';')
                .next()
                .unwrap_or_default()
                .to_string();
            self.cookie = Some(pair);
        }

        response
    }

    /// Mount the token exchange and `/users/me` for one user, then sign in.
    pub async fn sign_in_as(&mut self, role: &str, user_id: i64, token: &str) -> Response<Body> {
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": token,
                "token_type": "bearer"
            })))
            .mount(&self.api)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .and(header_eq("authorization", format!("Bearer {}", token).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": user_id,
                "email": "a@b.com",
                "role": role,
                "full_name": "Test User"
            })))
            .mount(&self.api)
            .await;

        self.post_form("/login", "email=a%40b.com&password=x").await
    }

    /// Answer `GET endpoint` with `body`.
    pub async fn mock_get(&self, endpoint: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.api)
            .await;
    }
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

pub fn assert_redirect(response: &Response<Body>, to: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response), to);
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
