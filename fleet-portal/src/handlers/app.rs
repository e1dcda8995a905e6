use crate::session::SessionStore;
use askama::Template;
use axum::http::header;
use axum::response::IntoResponse;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub landing: Option<&'static str>,
}

pub async fn index(session: SessionStore) -> impl IntoResponse {
    IndexTemplate {
        landing: session.role().await.map(|role| role.landing_path()),
    }
}

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        portal_core::observability::render_metrics(),
    )
}
