use crate::session::UnknownRole;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered 401. The session has already been signed out.
    #[error("fleet API rejected the session token")]
    Unauthorized,

    #[error("fleet API returned {status}")]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },

    #[error("fleet API unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("unexpected response from fleet API: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("cannot encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable `detail` the API attached to an error response.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SignInError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    UnknownRole(#[from] UnknownRole),
}
