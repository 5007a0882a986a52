//! API utility functions
//!
//! Helpers shared by the page handlers.

use crate::state::AppState;
use minijinja::{context, Value};

/// Template context common to every page
///
/// # Arguments
/// * `state` - Application state (decides whether the contact link is shown)
/// * `username` - Logged-in user, if any
/// * `error` - Inline error message for forms
pub fn page_context(state: &AppState, username: Option<&str>, error: Option<&str>) -> Value {
    context! {
        name => username,
        references => state.variant.has_references(),
        error => error,
    }
}
