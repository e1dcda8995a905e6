use axum::{
    http::{StatusCode, Uri},
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use portal_core::middleware::{metrics_middleware, request_id_middleware, security_headers_middleware};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::SessionSettings;
use crate::guard::{access_guard, RouteRequirement, LOGIN_PATH};
use crate::handlers::{
    app::{health_check, index, metrics},
    auth::{login_handler, login_page, logout_handler, register_handler, register_page},
    captain, operator,
};
use crate::session::Role;
use crate::AppState;

pub fn build_router(state: AppState, session: &SessionSettings) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(session.secure_cookie)
        .with_expiry(Expiry::OnInactivity(session.inactivity()));

    let operator_routes = Router::new()
        .route("/", get(operator::dashboard))
        .route("/ships", get(operator::ships_page).post(operator::create_ship))
        .route("/ships/:id/delete", post(operator::delete_ship))
        .route("/routes", get(operator::routes_page).post(operator::create_route))
        .route("/routes/:id/delete", post(operator::delete_route))
        .route("/reports", get(operator::reports_page))
        .route("/reports/:id/approve", post(operator::approve_report))
        .route("/reports/:id/reject", post(operator::reject_report))
        .route_layer(from_fn_with_state(
            RouteRequirement::role(Role::Operator),
            access_guard,
        ));

    let captain_routes = Router::new()
        .route("/", get(captain::dashboard))
        .route("/routes", get(captain::routes_page))
        .route("/routes/:id/start", post(captain::start_route))
        .route("/routes/:id/complete", post(captain::complete_route))
        .route("/spots", get(captain::spots_page).post(captain::create_spot))
        .route("/spots/:id/time", post(captain::update_spot_time))
        .route("/spots/:id/delete", post(captain::delete_spot))
        .route("/reports", get(captain::reports_page).post(captain::create_report))
        .route("/reports/:id/cancel", post(captain::cancel_report))
        .route("/reports/:id/delete", post(captain::delete_report))
        .route_layer(from_fn_with_state(
            RouteRequirement::role(Role::Captain),
            access_guard,
        ));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/login", get(login_page).post(login_handler))
        .route("/register", get(register_page).post(register_handler))
        .route("/logout", get(logout_handler).post(logout_handler))
        .nest("/app/operator", operator_routes)
        .nest("/app/captain", captain_routes)
        .fallback(fallback)
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Unknown screens inside the app go to the login page.
async fn fallback(uri: Uri) -> Response {
    let path = uri.path();
    if path == "/app" || path.starts_with("/app/") {
        return Redirect::to(LOGIN_PATH).into_response();
    }
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}
