//! Page handlers
//!
//! Landing redirect, chat page, contact page and health check.

use crate::api::utils::page_context;
use crate::error::AppError;
use crate::session::CurrentUser;
use crate::state::AppState;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always "healthy"
    pub status: String,
    /// Crate version
    pub version: String,
    /// Human-readable message
    pub message: String,
}

/// GET / - Send users to the chat or to the login form
pub async fn index(user: Option<CurrentUser>) -> Redirect {
    if user.is_some() {
        Redirect::to("/chat")
    } else {
        Redirect::to("/login")
    }
}

/// GET /chat - Chat page
pub async fn chat_page(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
) -> Result<Response, AppError> {
    let Some(CurrentUser(username)) = user else {
        return Ok(Redirect::to("/login").into_response());
    };
    let page = state
        .templates
        .render("chat.html", page_context(&state, Some(username.as_str()), None))?;
    Ok(page.into_response())
}

/// GET /contact - Static contact page
pub async fn contact(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
) -> Result<Html<String>, AppError> {
    let username = user.map(|CurrentUser(name)| name);
    state
        .templates
        .render("contact.html", page_context(&state, username.as_deref(), None))
}

/// GET /api/health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        message: "Backend is healthy".to_string(),
    })
}
