use super::{ApiError, ApiGateway, ApiRequest, SignInError};
use crate::models::{RegisterRequest, TokenResponse, User};
use crate::session::Role;
use secrecy::Secret;

pub struct AuthApi<'a> {
    gateway: &'a ApiGateway,
}

impl<'a> AuthApi<'a> {
    pub(super) fn new(gateway: &'a ApiGateway) -> Self {
        Self { gateway }
    }

    /// Exchange credentials for a bearer token (`POST /token`, form-encoded).
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let request = ApiRequest::post("/token").form(vec![
            ("username", username.to_string()),
            ("password", password.to_string()),
        ]);
        self.gateway.send(request).await
    }

    pub async fn register(&self, registration: &RegisterRequest) -> Result<User, ApiError> {
        self.gateway
            .send(ApiRequest::post("/register").json(registration)?)
            .await
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.gateway.send(ApiRequest::get("/users/me")).await
    }

    pub async fn current_user_with_token(&self, token: &Secret<String>) -> Result<User, ApiError> {
        self.gateway
            .send_with_token(ApiRequest::get("/users/me"), token)
            .await
    }

    /// Full sign-in: obtain a token, look up who it belongs to, then record
    /// token, role and user id in the session together.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<Role, SignInError> {
        let token = self.login(username, password).await?.access_token;
        let user = self.current_user_with_token(&token).await?;
        let role = user.role()?;

        self.gateway.session().login(token, role, user.id).await;
        Ok(role)
    }
}
