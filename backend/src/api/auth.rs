//! Registration, login and logout handlers
//!
//! Validation failures re-render the form with an inline message.

use crate::api::utils::page_context;
use crate::error::AppError;
use crate::session::{self, CurrentUser};
use crate::state::AppState;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;
use tracing::{info, warn};

/// Registration form fields
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    /// Desired username
    #[serde(default)]
    pub username: String,
    /// Email address, stored as entered
    #[serde(default)]
    pub email: String,
    /// Password
    #[serde(default)]
    pub password: String,
}

/// Login form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Username
    #[serde(default)]
    pub username: String,
    /// Password
    #[serde(default)]
    pub password: String,
}

fn form_page(
    state: &AppState,
    template: &str,
    user: Option<CurrentUser>,
    error: Option<&str>,
) -> Result<Html<String>, AppError> {
    let username = user.map(|CurrentUser(name)| name);
    state
        .templates
        .render(template, page_context(state, username.as_deref(), error))
}

/// GET /register
pub async fn register_page(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
) -> Result<Html<String>, AppError> {
    form_page(&state, "register.html", user, None)
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    match state
        .register_user(&form.username, &form.email, &form.password)
        .await
    {
        Ok(()) => Ok(Redirect::to("/login").into_response()),
        Err(e @ AppError::UserAlreadyExists(_)) => {
            warn!(username = %form.username, "Registration for existing username");
            let message = e.to_string();
            Ok(form_page(&state, "register.html", None, Some(&message))?.into_response())
        }
        Err(e) => Err(e),
    }
}

/// GET /login
pub async fn login_page(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
) -> Result<Html<String>, AppError> {
    form_page(&state, "login.html", user, None)
}

/// POST /login - Start a session on valid credentials
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if state.authenticate(&form.username, &form.password).await {
        info!(username = %form.username, "User logged in");
        return Ok((session::start(jar, &form.username), Redirect::to("/chat")).into_response());
    }

    warn!(username = %form.username, "Failed login attempt");
    let message = AppError::InvalidCredentials.to_string();
    Ok(form_page(&state, "login.html", None, Some(&message))?.into_response())
}

/// GET /logout - Clear the session
pub async fn logout(jar: SignedCookieJar) -> (SignedCookieJar, Redirect) {
    if let Some(username) = session::username(&jar) {
        info!(username = %username, "User logged out");
    }
    (session::end(jar), Redirect::to("/login"))
}
