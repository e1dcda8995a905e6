//! Screens of the portal.
//!
//! Handlers load what a screen needs through an [`ApiGateway`] bound to the
//! browser's session. A failed load or action renders the same screen with a
//! banner; a 401 from the API has already signed the session out and becomes
//! a redirect to the login page.

pub mod app;
pub mod auth;
pub mod captain;
pub mod operator;

use crate::api::{ApiError, ApiGateway};
use crate::guard::LOGIN_PATH;
use crate::session::SessionStore;
use crate::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};

#[async_trait]
impl FromRequestParts<AppState> for ApiGateway {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = SessionStore::from_request_parts(parts, state).await?;
        Ok(state.api.with_session(session))
    }
}

/// The session is gone; send the browser to the login page.
#[derive(Debug)]
pub struct SignedOut;

impl IntoResponse for SignedOut {
    fn into_response(self) -> Response {
        Redirect::to(LOGIN_PATH).into_response()
    }
}

pub(crate) trait ApiResultExt<T> {
    /// Keep the value, or record `message` as the screen's banner and carry on
    /// with nothing. Only a rejected session stops the screen.
    fn or_banner(self, banner: &mut Option<String>, message: &str) -> Result<Option<T>, SignedOut>;
}

impl<T> ApiResultExt<T> for Result<T, ApiError> {
    fn or_banner(self, banner: &mut Option<String>, message: &str) -> Result<Option<T>, SignedOut> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(ApiError::Unauthorized) => Err(SignedOut),
            Err(e) => {
                tracing::warn!(error = %e, detail = ?e.detail(), "{}", message);
                banner.get_or_insert_with(|| message.to_string());
                Ok(None)
            }
        }
    }
}

/// Signed-in user id, or the session vanished mid-request.
pub(crate) async fn current_user_id(gateway: &ApiGateway) -> Result<i64, SignedOut> {
    gateway.session().user_id().await.ok_or(SignedOut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn first_failure_sets_the_banner() {
        let mut banner = None;
        let failed: Result<u8, ApiError> = Err(ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: None,
        });
        assert!(matches!(failed.or_banner(&mut banner, "Could not load ships"), Ok(None)));

        let failed_again: Result<u8, ApiError> = Err(ApiError::Status {
            status: StatusCode::BAD_GATEWAY,
            detail: None,
        });
        assert!(matches!(failed_again.or_banner(&mut banner, "Could not load routes"), Ok(None)));
        assert_eq!(banner.as_deref(), Some("Could not load ships"));

        assert!(matches!(Ok::<u8, ApiError>(3).or_banner(&mut banner, "unused"), Ok(Some(3))));
    }

    #[test]
    fn unauthorized_redirects_to_login() {
        let mut banner = None;
        let result = Err::<u8, _>(ApiError::Unauthorized).or_banner(&mut banner, "Could not load ships");
        let response = result.unwrap_err().into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/login");
        assert!(banner.is_none());
    }
}
