//! Router assembly
//!
//! Builds the HTTP surface for the configured variant.

use crate::api;
use crate::state::AppState;
use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Request ID middleware - adds unique ID to each request for tracing
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}

/// Build the application router
///
/// `/get_references` and `/contact` exist only in the references variant.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(api::pages::index))
        .route("/api/health", get(api::pages::health_check))
        .route(
            "/register",
            get(api::auth::register_page).post(api::auth::register),
        )
        .route("/login", get(api::auth::login_page).post(api::auth::login))
        .route("/logout", get(api::auth::logout))
        .route("/chat", get(api::pages::chat_page))
        .route("/get_response", post(api::chat::get_response))
        .route("/download_chat", get(api::export::download_chat));

    if state.variant.has_references() {
        router = router
            .route("/get_references", post(api::references::get_references))
            .route("/contact", get(api::pages::contact));
    }

    router
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .with_state(state)
}
