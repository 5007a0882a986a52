//! Transcript download endpoint

use crate::error::AppError;
use crate::export::{download_filename, DOCX_MIME};
use crate::session::CurrentUser;
use crate::state::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Redirect, Response},
};

/// GET /download_chat - The user's conversation as a `.docx` attachment
pub async fn download_chat(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
) -> Result<Response, AppError> {
    let Some(CurrentUser(username)) = user else {
        return Ok(Redirect::to("/login").into_response());
    };

    let turns = state.conversation(&username).await?;
    let document = state.exporter.render(&username, &turns)?;

    tracing::info!(
        username = %username,
        turns = turns.len(),
        bytes = document.len(),
        "Transcript exported"
    );

    let disposition = format!("attachment; filename=\"{}\"", download_filename(&username));
    Ok((
        [
            (header::CONTENT_TYPE, DOCX_MIME.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document,
    )
        .into_response())
}
