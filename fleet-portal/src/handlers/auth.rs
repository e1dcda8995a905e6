use crate::api::{ApiGateway, SignInError};
use crate::forms::{FormError, LoginForm, RegisterForm};
use crate::guard::{evaluate_guest, Decision};
use crate::session::{Role, SessionStore};
use askama::Template;
use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use validator::Validate;

const LOGIN_FAILED: &str = "Invalid email or password";
const REGISTER_FAILED: &str = "Registration failed. Please try again.";

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub banner: Option<String>,
    pub notice: Option<&'static str>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub email: String,
    pub full_name: String,
    pub company: String,
    pub role: String,
    pub banner: Option<String>,
}

impl RegisterTemplate {
    fn blank() -> Self {
        Self {
            email: String::new(),
            full_name: String::new(),
            company: String::new(),
            role: Role::Captain.as_str().to_string(),
            banner: None,
        }
    }

    fn refill(form: &RegisterForm, banner: String) -> Self {
        Self {
            email: form.email.clone(),
            full_name: form.full_name.clone(),
            company: form.company.clone(),
            role: form.role.clone(),
            banner: Some(banner),
        }
    }

    pub fn roles(&self) -> [Role; 2] {
        [Role::Operator, Role::Captain]
    }
}

#[derive(Deserialize)]
pub struct LoginQuery {
    pub registered: Option<String>,
}

/// Signed-in browsers skip the guest pages.
async fn guest_redirect(session: &SessionStore) -> Option<Response> {
    match evaluate_guest(&session.snapshot().await) {
        Decision::Render => None,
        Decision::Redirect(target) => Some(Redirect::to(target.path()).into_response()),
    }
}

pub async fn login_page(
    session: SessionStore,
    Query(query): Query<LoginQuery>,
) -> Response {
    if let Some(redirect) = guest_redirect(&session).await {
        return redirect;
    }
    LoginTemplate {
        email: String::new(),
        banner: None,
        notice: query
            .registered
            .map(|_| "Registration complete. Please sign in."),
    }
    .into_response()
}

pub async fn login_handler(gateway: ApiGateway, Form(form): Form<LoginForm>) -> Response {
    if let Err(e) = form.validate() {
        let banner = FormError::from(e).to_string();
        return login_failed(form.email, banner, StatusCode::UNPROCESSABLE_ENTITY);
    }

    match gateway.auth().sign_in(form.email.trim(), &form.password).await {
        Ok(role) => Redirect::to(role.landing_path()).into_response(),
        Err(SignInError::UnknownRole(e)) => {
            tracing::warn!(error = %e, "Signed-in user has a role the portal does not serve");
            login_failed(form.email, LOGIN_FAILED.to_string(), StatusCode::OK)
        }
        Err(SignInError::Api(e)) => {
            tracing::info!(error = %e, "Sign-in failed");
            login_failed(form.email, LOGIN_FAILED.to_string(), StatusCode::OK)
        }
    }
}

fn login_failed(email: String, banner: String, status: StatusCode) -> Response {
    let template = LoginTemplate {
        email,
        banner: Some(banner),
        notice: None,
    };
    (status, template).into_response()
}

pub async fn register_page(session: SessionStore) -> Response {
    if let Some(redirect) = guest_redirect(&session).await {
        return redirect;
    }
    RegisterTemplate::blank().into_response()
}

pub async fn register_handler(gateway: ApiGateway, Form(form): Form<RegisterForm>) -> Response {
    let request = match form.to_request() {
        Ok(request) => request,
        Err(e) => {
            let template = RegisterTemplate::refill(&form, e.to_string());
            return (StatusCode::UNPROCESSABLE_ENTITY, template).into_response();
        }
    };

    match gateway.auth().register(&request).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, role = %request.role, "Registered new user");
            Redirect::to("/login?registered=1").into_response()
        }
        Err(e) => {
            tracing::info!(error = %e, "Registration rejected");
            let banner = e.detail().unwrap_or(REGISTER_FAILED).to_string();
            RegisterTemplate::refill(&form, banner).into_response()
        }
    }
}

pub async fn logout_handler(session: SessionStore) -> Redirect {
    session.logout().await;
    Redirect::to("/")
}
