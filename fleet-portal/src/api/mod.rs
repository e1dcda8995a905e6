//! Client for the fleet REST API.
//!
//! [`FleetApi`] is built once at startup and owns the HTTP connection pool.
//! Each browser request binds it to its own [`SessionStore`] with
//! [`FleetApi::with_session`]; the resulting [`ApiGateway`] attaches the
//! session's bearer token to every call and signs the session out when the
//! API answers 401.

pub mod auth;
pub mod captain;
pub mod error;
pub mod operator;

use crate::config::FleetApiSettings;
use crate::session::SessionStore;
use metrics::{counter, histogram};
use portal_core::observability::TracedClientExt;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub use auth::AuthApi;
pub use captain::CaptainApi;
pub use error::{ApiError, SignInError};
pub use operator::OperatorApi;

/// Process-wide handle on the fleet API. Cheap to clone.
#[derive(Clone, Debug)]
pub struct FleetApi {
    client: reqwest::Client,
    base_url: Arc<str>,
}

impl FleetApi {
    pub fn new(settings: &FleetApiSettings) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().user_agent(settings.user_agent.as_str());
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(ApiError::Transport)?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn with_session(&self, session: SessionStore) -> ApiGateway {
        ApiGateway {
            api: self.clone(),
            session,
        }
    }
}

/// The fleet API as seen by one browser session.
#[derive(Clone, Debug)]
pub struct ApiGateway {
    api: FleetApi,
    session: SessionStore,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    fn method(&self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }
}

#[derive(Debug)]
enum RequestBody {
    Json(serde_json::Value),
    Form(Vec<(&'static str, String)>),
}

/// One call against the API. `endpoint` is the path template (`/operator/ships/{id}`)
/// used for logs and metrics; `path` is what is actually requested.
#[derive(Debug)]
pub(crate) struct ApiRequest {
    verb: Verb,
    endpoint: &'static str,
    path: String,
    query: Vec<(String, String)>,
    body: Option<RequestBody>,
}

impl ApiRequest {
    fn new(verb: Verb, endpoint: &'static str) -> Self {
        Self {
            verb,
            endpoint,
            path: endpoint.to_string(),
            query: Vec::new(),
            body: None,
        }
    }

    pub(crate) fn get(endpoint: &'static str) -> Self {
        Self::new(Verb::Get, endpoint)
    }

    pub(crate) fn post(endpoint: &'static str) -> Self {
        Self::new(Verb::Post, endpoint)
    }

    pub(crate) fn put(endpoint: &'static str) -> Self {
        Self::new(Verb::Put, endpoint)
    }

    pub(crate) fn delete(endpoint: &'static str) -> Self {
        Self::new(Verb::Delete, endpoint)
    }

    /// Fill the `{id}` placeholder of the endpoint template.
    pub(crate) fn id(mut self, id: i64) -> Self {
        self.path = self.endpoint.replace("{id}", &id.to_string());
        self
    }

    pub(crate) fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(ApiError::Encode)?;
        self.body = Some(RequestBody::Json(value));
        Ok(self)
    }

    /// Send the fields of `params` as query parameters. Null fields are left out.
    pub(crate) fn query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Result<Self, ApiError> {
        let serde_json::Value::Object(fields) = serde_json::to_value(params).map_err(ApiError::Encode)? else {
            return Err(ApiError::Encode(serde::ser::Error::custom(
                "query parameters must serialize to an object",
            )));
        };
        for (name, value) in fields {
            match value {
                serde_json::Value::Null => {}
                serde_json::Value::String(text) => self.query.push((name, text)),
                other => self.query.push((name, other.to_string())),
            }
        }
        Ok(self)
    }

    pub(crate) fn form(mut self, fields: Vec<(&'static str, String)>) -> Self {
        self.body = Some(RequestBody::Form(fields));
        self
    }
}

// FastAPI error bodies: `{"detail": "..."}`, or a list of field errors.
#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl ErrorBody {
    fn into_text(self) -> Option<String> {
        match self.detail {
            serde_json::Value::Null => None,
            serde_json::Value::String(text) => Some(text),
            other => Some(other.to_string()),
        }
    }
}

impl ApiGateway {
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn operator(&self) -> OperatorApi<'_> {
        OperatorApi::new(self)
    }

    pub fn captain(&self) -> CaptainApi<'_> {
        CaptainApi::new(self)
    }

    /// Send with whatever token the session holds right now.
    pub(crate) async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let token = self.session.token().await;
        self.dispatch(request, token.as_ref()).await
    }

    /// Send with an explicit token, for the sign-in exchange before the session holds one.
    pub(crate) async fn send_with_token<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        token: &Secret<String>,
    ) -> Result<T, ApiError> {
        self.dispatch(request, Some(token)).await
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        token: Option<&Secret<String>>,
    ) -> Result<T, ApiError> {
        let ApiRequest {
            verb,
            endpoint,
            path,
            query,
            body,
        } = request;
        let url = format!("{}{}", self.api.base_url, path);
        let client = &self.api.client;

        let mut traced = client.traced(verb.method(), &url);
        if let Some(token) = token {
            traced = traced.bearer_auth(token.expose_secret());
        }
        if !query.is_empty() {
            traced = traced.query(&query);
        }
        traced = match &body {
            Some(RequestBody::Json(value)) => traced.json(value),
            Some(RequestBody::Form(fields)) => traced.form(fields),
            None => traced,
        };

        let started = Instant::now();
        let result = traced.send().await;
        let status_label = match &result {
            Ok(response) => response.status().as_u16().to_string(),
            Err(_) => "error".to_string(),
        };
        let labels = [
            ("method", verb.as_str().to_string()),
            ("endpoint", endpoint.to_string()),
            ("status", status_label),
        ];
        counter!("fleet_api_requests_total", &labels).increment(1);
        histogram!("fleet_api_request_duration_seconds", &labels)
            .record(started.elapsed().as_secs_f64());

        let response = result.map_err(|e| {
            tracing::error!(method = verb.as_str(), endpoint, error = %e, "Fleet API request failed");
            ApiError::Transport(e)
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(
                method = verb.as_str(),
                endpoint,
                authenticated = token.is_some(),
                "Fleet API answered 401, signing the session out"
            );
            self.session.logout().await;
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(ErrorBody::into_text);
            tracing::warn!(method = verb.as_str(), endpoint, %status, detail = ?detail, "Fleet API call failed");
            return Err(ApiError::Status { status, detail });
        }

        let bytes = response.bytes().await.map_err(ApiError::Transport)?;
        tracing::debug!(method = verb.as_str(), endpoint, %status, "Fleet API call succeeded");

        if bytes.is_empty() {
            return serde_json::from_slice(b"null").map_err(ApiError::Decode);
        }
        serde_json::from_slice(&bytes).map_err(ApiError::Decode)
    }
}
