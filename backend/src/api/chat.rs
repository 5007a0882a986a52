//! Chat API endpoint

use crate::chat::ChatReply;
use crate::session::CurrentUser;
use crate::state::AppState;
use axum::{extract::State, Form, Json};
use serde::Deserialize;

/// Chat form fields
#[derive(Debug, Deserialize)]
pub struct ChatForm {
    /// The user's message; a missing field is an empty message
    #[serde(default)]
    pub user_input: String,
}

/// POST /get_response - Relay a message to the model
///
/// Generation errors are reported inside `response`, never as an HTTP error.
pub async fn get_response(
    State(state): State<AppState>,
    CurrentUser(username): CurrentUser,
    Form(form): Form<ChatForm>,
) -> Json<ChatReply> {
    Json(
        state
            .orchestrator
            .handle_message(&username, &form.user_input)
            .await,
    )
}
