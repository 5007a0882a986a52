//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// Validation errors (duplicate user, bad credentials, bad turn index) are
/// usually rendered inline by the handlers; the `IntoResponse` impl is the
/// fallback for JSON routes.
#[derive(Error, Debug)]
pub enum AppError {
    /// Registration with a username that is already taken
    #[error("Username already exists")]
    UserAlreadyExists(String),

    /// Login with an unknown username or a wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Request to a protected route without a session
    #[error("Not logged in")]
    Unauthorized,

    /// No conversation is registered for the given user
    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    /// Turn index outside of the conversation
    #[error("Invalid index")]
    InvalidIndex,

    /// Generation API call failed
    #[error("Gemini API error: {0}")]
    Generation(String),

    /// Search API call failed
    #[error("Search API error: {0}")]
    Search(String),

    /// Building the transcript document failed
    #[error("Export failed: {0}")]
    Export(#[from] zip::result::ZipError),

    /// Loading or rendering a page template failed
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Password hashing failed
    #[error("Credential error: {0}")]
    Credential(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::UserAlreadyExists(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::ConversationNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidIndex => StatusCode::BAD_REQUEST,
            AppError::Generation(_) => StatusCode::BAD_GATEWAY,
            AppError::Search(_) => StatusCode::BAD_GATEWAY,
            AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Credential(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
