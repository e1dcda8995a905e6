//! Decides whether a navigation to a protected screen may render.
//!
//! The decision is recomputed from the browser's stored session on every
//! request; nothing is cached between navigations.

use crate::session::{Role, Session, SessionStore};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

pub const LOGIN_PATH: &str = "/login";

/// What a screen demands of the session before it renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRequirement {
    pub required_role: Option<Role>,
}

impl RouteRequirement {
    /// Any signed-in user.
    pub fn authenticated() -> Self {
        Self { required_role: None }
    }

    pub fn role(role: Role) -> Self {
        Self {
            required_role: Some(role),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    Login,
    Landing(Role),
}

impl RedirectTarget {
    pub fn path(&self) -> &'static str {
        match self {
            RedirectTarget::Login => LOGIN_PATH,
            RedirectTarget::Landing(role) => role.landing_path(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Render,
    Redirect(RedirectTarget),
}

/// Anonymous sessions always go to login. A signed-in session with the wrong
/// role also goes to login.
pub fn evaluate(session: &Session, requirement: &RouteRequirement) -> Decision {
    if !session.is_authenticated() {
        return Decision::Redirect(RedirectTarget::Login);
    }

    match requirement.required_role {
        None => Decision::Render,
        Some(required) if session.role() == Some(required) => Decision::Render,
        Some(_) => Decision::Redirect(RedirectTarget::Login),
    }
}

/// Login and register pages: a signed-in browser is sent to its landing page.
pub fn evaluate_guest(session: &Session) -> Decision {
    match session.role() {
        Some(role) if session.is_authenticated() => {
            Decision::Redirect(RedirectTarget::Landing(role))
        }
        _ => Decision::Render,
    }
}

pub async fn access_guard(
    State(requirement): State<RouteRequirement>,
    browser: tower_sessions::Session,
    mut request: Request,
    next: Next,
) -> Response {
    let store = SessionStore::initialize(browser).await;
    let session = store.snapshot().await;

    match evaluate(&session, &requirement) {
        Decision::Render => {
            request.extensions_mut().insert(store);
            next.run(request).await
        }
        Decision::Redirect(target) => {
            tracing::info!(
                path = %request.uri().path(),
                required_role = ?requirement.required_role,
                role = ?session.role(),
                redirect = target.path(),
                "Access guard redirected navigation"
            );
            Redirect::to(target.path()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn signed_in(role: Role) -> Session {
        Session::authenticated(Secret::new("T1".to_string()), role, 7)
    }

    #[test]
    fn decision_table() {
        let cases = [
            (Session::anonymous(), RouteRequirement::authenticated(), Decision::Redirect(RedirectTarget::Login)),
            (Session::anonymous(), RouteRequirement::role(Role::Operator), Decision::Redirect(RedirectTarget::Login)),
            (Session::anonymous(), RouteRequirement::role(Role::Captain), Decision::Redirect(RedirectTarget::Login)),
            (signed_in(Role::Captain), RouteRequirement::authenticated(), Decision::Render),
            (signed_in(Role::Captain), RouteRequirement::role(Role::Captain), Decision::Render),
            (signed_in(Role::Captain), RouteRequirement::role(Role::Operator), Decision::Redirect(RedirectTarget::Login)),
            (signed_in(Role::Operator), RouteRequirement::role(Role::Operator), Decision::Render),
            (signed_in(Role::Operator), RouteRequirement::role(Role::Captain), Decision::Redirect(RedirectTarget::Login)),
        ];

        for (session, requirement, expected) in cases {
            assert_eq!(
                evaluate(&session, &requirement),
                expected,
                "role {:?} requiring {:?}",
                session.role(),
                requirement.required_role
            );
        }
    }

    #[test]
    fn guests_render_and_members_go_home() {
        assert_eq!(evaluate_guest(&Session::anonymous()), Decision::Render);
        assert_eq!(
            evaluate_guest(&signed_in(Role::Operator)),
            Decision::Redirect(RedirectTarget::Landing(Role::Operator))
        );
    }

    #[test]
    fn redirect_paths() {
        assert_eq!(RedirectTarget::Login.path(), "/login");
        assert_eq!(RedirectTarget::Landing(Role::Captain).path(), "/app/captain");
    }
}
