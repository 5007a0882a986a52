//! Reference lookup endpoint

use crate::error::AppError;
use crate::references::References;
use crate::session::CurrentUser;
use crate::state::AppState;
use anyhow::anyhow;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use serde_json::json;

/// Reference form fields
#[derive(Debug, Deserialize)]
pub struct ReferencesForm {
    /// Turn position, as typed by the client
    #[serde(default)]
    pub index: String,
}

/// POST /get_references - Attach search results to a stored turn
///
/// An unparsable or out-of-range index yields `{"error": "Invalid index"}`
/// in a normal 200 reply.
pub async fn get_references(
    State(state): State<AppState>,
    CurrentUser(username): CurrentUser,
    Form(form): Form<ReferencesForm>,
) -> Result<Response, AppError> {
    match lookup(&state, &username, &form).await {
        Ok(references) => Ok(Json(references).into_response()),
        Err(AppError::InvalidIndex) => {
            Ok(Json(json!({ "error": AppError::InvalidIndex.to_string() })).into_response())
        }
        Err(e) => Err(e),
    }
}

async fn lookup(
    state: &AppState,
    username: &str,
    form: &ReferencesForm,
) -> Result<References, AppError> {
    let augmenter = state
        .augmenter
        .as_ref()
        .ok_or_else(|| AppError::Internal(anyhow!("Reference lookup is disabled")))?;

    let index: i64 = form
        .index
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidIndex)?;

    augmenter.fetch_references(username, index).await
}
