use crate::session::{Role, UnknownRole};
use secrecy::Secret;
use serde::{Deserialize, Serialize};

/// `POST /token` response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Secret<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// `POST /register` body.
#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub company: String,
    pub full_name: String,
}

/// A fleet user as returned by `/users/me`, `/register` and `/operator/captains/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub email: String,
    /// Kept as received; see [`User::role`].
    pub role: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

impl User {
    pub fn role(&self) -> Result<Role, UnknownRole> {
        self.role.parse()
    }

    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}
