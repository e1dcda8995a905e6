//! Who is signed in for the current browser.
//!
//! [`SessionStore`] owns the [`Session`] and mirrors it into [`DurableStorage`]
//! under the `token`, `userRole` and `userId` keys, so the sign-in survives
//! across requests. The guard and the API gateway read it; only `login` and
//! `logout` change it.

pub mod storage;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use portal_core::error::AppError;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;

pub use storage::{DurableStorage, MemoryStorage, StorageError};
use storage::{ROLE_KEY, TOKEN_KEY, USER_ID_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Operator,
    Captain,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Operator => "operator",
            Role::Captain => "captain",
        }
    }

    /// Where a freshly signed-in user of this role lands.
    pub fn landing_path(&self) -> &'static str {
        match self {
            Role::Operator => "/app/operator",
            Role::Captain => "/app/captain",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "operator" => Ok(Role::Operator),
            "captain" => Ok(Role::Captain),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
struct Credentials {
    token: Secret<String>,
    role: Role,
    user_id: i64,
}

/// Snapshot of the sign-in state.
///
/// Token, role and user id are present together or not at all, so a session
/// is authenticated exactly when it carries a token.
#[derive(Debug, Clone, Default)]
pub struct Session {
    credentials: Option<Credentials>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: Secret<String>, role: Role, user_id: i64) -> Self {
        Self {
            credentials: Some(Credentials {
                token,
                role,
                user_id,
            }),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn token(&self) -> Option<&Secret<String>> {
        self.credentials.as_ref().map(|c| &c.token)
    }

    pub fn role(&self) -> Option<Role> {
        self.credentials.as_ref().map(|c| c.role)
    }

    pub fn user_id(&self) -> Option<i64> {
        self.credentials.as_ref().map(|c| c.user_id)
    }
}

/// Shared handle on one browser's session. Clones see the same state.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn DurableStorage>,
    state: Arc<RwLock<Session>>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Rehydrate from durable storage. The token is not checked against the
    /// API here; a stale token surfaces as a 401 on the first call.
    ///
    /// A stored token without a readable role and user id is discarded.
    pub async fn initialize(storage: impl DurableStorage + 'static) -> Self {
        let storage: Arc<dyn DurableStorage> = Arc::new(storage);
        let session = match rehydrate(storage.as_ref()).await {
            Ok(Some(session)) => session,
            Ok(None) => Session::anonymous(),
            Err(reason) => {
                tracing::warn!(reason = %reason, "Discarding inconsistent stored session");
                clear_storage(storage.as_ref()).await;
                Session::anonymous()
            }
        };

        Self {
            storage,
            state: Arc::new(RwLock::new(session)),
        }
    }

    pub async fn snapshot(&self) -> Session {
        self.state.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    pub async fn token(&self) -> Option<Secret<String>> {
        self.state.read().await.token().cloned()
    }

    pub async fn role(&self) -> Option<Role> {
        self.state.read().await.role()
    }

    pub async fn user_id(&self) -> Option<i64> {
        self.state.read().await.user_id()
    }

    /// Record a successful sign-in.
    ///
    /// The write lock is held across the storage writes, so readers observe
    /// either the old session or the complete new one.
    pub async fn login(&self, token: Secret<String>, role: Role, user_id: i64) {
        let mut state = self.state.write().await;

        let user_id_text = user_id.to_string();
        let writes = [
            (TOKEN_KEY, token.expose_secret().as_str()),
            (ROLE_KEY, role.as_str()),
            (USER_ID_KEY, user_id_text.as_str()),
        ];
        for (key, value) in writes {
            if let Err(e) = self.storage.write(key, value).await {
                tracing::error!(key, error = %e, "Failed to persist session field");
            }
        }

        *state = Session::authenticated(token, role, user_id);
        tracing::info!(user_id, role = %role, "Session signed in");
    }

    /// Forget the sign-in. Calling it on an anonymous session is a no-op.
    pub async fn logout(&self) {
        let mut state = self.state.write().await;
        if !state.is_authenticated() {
            return;
        }

        clear_storage(self.storage.as_ref()).await;
        let user_id = state.user_id();
        *state = Session::anonymous();
        tracing::info!(user_id = ?user_id, "Session signed out");
    }
}

async fn rehydrate(storage: &dyn DurableStorage) -> Result<Option<Session>, String> {
    let token = storage.read(TOKEN_KEY).await.map_err(|e| e.to_string())?;
    let Some(token) = token else {
        return Ok(None);
    };

    let role = storage
        .read(ROLE_KEY)
        .await
        .map_err(|e| e.to_string())?
        .ok_or("token stored without a role")?
        .parse::<Role>()
        .map_err(|e| e.to_string())?;
    let user_id = storage
        .read(USER_ID_KEY)
        .await
        .map_err(|e| e.to_string())?
        .ok_or("token stored without a user id")?
        .parse::<i64>()
        .map_err(|e| format!("stored user id is not an integer: {}", e))?;

    Ok(Some(Session::authenticated(Secret::new(token), role, user_id)))
}

async fn clear_storage(storage: &dyn DurableStorage) {
    for key in [TOKEN_KEY, ROLE_KEY, USER_ID_KEY] {
        if let Err(e) = storage.remove(key).await {
            tracing::error!(key, error = %e, "Failed to clear session field");
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionStore
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // The access guard already rehydrated this request's session.
        if let Some(store) = parts.extensions.get::<SessionStore>() {
            return Ok(store.clone());
        }

        let browser = tower_sessions::Session::from_request_parts(parts, state)
            .await
            .map_err(|(status, message)| {
                AppError::InternalError(anyhow::anyhow!("{} ({})", message, status)).into_response()
            })?;

        let store = SessionStore::initialize(browser).await;
        parts.extensions.insert(store.clone());
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(value: &str) -> Secret<String> {
        Secret::new(value.to_string())
    }

    #[test]
    fn role_round_trips_through_its_wire_name() {
        assert_eq!("operator".parse::<Role>().unwrap(), Role::Operator);
        assert_eq!("captain".parse::<Role>().unwrap(), Role::Captain);
        assert_eq!(Role::Captain.to_string(), "captain");
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn authenticated_iff_token_present() {
        let anonymous = Session::anonymous();
        assert!(!anonymous.is_authenticated());
        assert!(anonymous.token().is_none());
        assert!(anonymous.role().is_none());
        assert!(anonymous.user_id().is_none());

        let session = Session::authenticated(token("T1"), Role::Operator, 3);
        assert!(session.is_authenticated());
        assert_eq!(session.token().unwrap().expose_secret(), "T1");
        assert_eq!(session.role(), Some(Role::Operator));
        assert_eq!(session.user_id(), Some(3));
    }

    #[test]
    fn debug_output_redacts_the_token() {
        let session = Session::authenticated(token("super-secret"), Role::Captain, 7);
        assert!(!format!("{:?}", session).contains("super-secret"));
    }

    #[tokio::test]
    async fn starts_anonymous_with_empty_storage() {
        let store = SessionStore::initialize(MemoryStorage::new()).await;
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn login_persists_all_three_fields() {
        let storage = MemoryStorage::new();
        let store = SessionStore::initialize(storage.clone()).await;

        store.login(token("T1"), Role::Captain, 7).await;

        let session = store.snapshot().await;
        assert!(session.is_authenticated());
        assert_eq!(session.role(), Some(Role::Captain));
        assert_eq!(session.user_id(), Some(7));
        assert_eq!(storage.get("token").as_deref(), Some("T1"));
        assert_eq!(storage.get("userRole").as_deref(), Some("captain"));
        assert_eq!(storage.get("userId").as_deref(), Some("7"));
    }

    #[tokio::test]
    async fn rehydrates_from_storage() {
        let storage =
            MemoryStorage::with_entries([("token", "T9"), ("userRole", "operator"), ("userId", "12")]);

        let store = SessionStore::initialize(storage).await;

        let session = store.snapshot().await;
        assert_eq!(session.token().unwrap().expose_secret(), "T9");
        assert_eq!(session.role(), Some(Role::Operator));
        assert_eq!(session.user_id(), Some(12));
    }

    #[tokio::test]
    async fn logout_then_initialize_is_anonymous() {
        let storage = MemoryStorage::new();
        let store = SessionStore::initialize(storage.clone()).await;
        store.login(token("T1"), Role::Operator, 1).await;

        store.logout().await;
        assert!(!store.is_authenticated().await);
        assert!(storage.is_empty());

        let again = SessionStore::initialize(storage).await;
        assert!(!again.is_authenticated().await);
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let storage = MemoryStorage::with_entries([("theme", "dark")]);
        let store = SessionStore::initialize(storage.clone()).await;

        store.logout().await;
        store.logout().await;

        assert!(!store.is_authenticated().await);
        assert_eq!(storage.get("theme").as_deref(), Some("dark"));
    }

    #[tokio::test]
    async fn token_without_role_is_discarded() {
        let storage = MemoryStorage::with_entries([("token", "T1"), ("userId", "4")]);

        let store = SessionStore::initialize(storage.clone()).await;

        assert!(!store.is_authenticated().await);
        assert!(storage.get("token").is_none());
        assert!(storage.get("userId").is_none());
    }

    #[tokio::test]
    async fn unparsable_user_id_is_discarded() {
        let storage =
            MemoryStorage::with_entries([("token", "T1"), ("userRole", "captain"), ("userId", "seven")]);

        let store = SessionStore::initialize(storage).await;

        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = SessionStore::initialize(MemoryStorage::new()).await;
        let other = store.clone();

        store.login(token("T1"), Role::Operator, 2).await;
        assert!(other.is_authenticated().await);

        other.logout().await;
        assert!(!store.is_authenticated().await);
    }
}
