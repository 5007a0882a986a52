//! Integration tests for the HTTP surface
//!
//! These tests drive the full router with in-process fakes for the model and
//! the search backend:
//! 1. Registration and login
//! 2. Session gating of pages and JSON routes
//! 3. Chat, reference lookup and transcript export

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chat_relay_backend::app::build_router;
use chat_relay_backend::chat::orchestrator::MODEL_NOT_INITIALIZED;
use chat_relay_backend::config::AppVariant;
use chat_relay_backend::error::AppError;
use chat_relay_backend::llm::Generator;
use chat_relay_backend::references::SearchProvider;
use chat_relay_backend::state::AppState;
use serde_json::Value;
use std::io::{Cursor, Read};
use std::sync::Arc;
use tower::ServiceExt;

struct FakeGenerator;

#[async_trait]
impl Generator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        Ok(format!("answer to {}", prompt))
    }
}

struct FakeSearch;

#[async_trait]
impl SearchProvider for FakeSearch {
    async fn search_links(&self, query: &str, limit: usize) -> Result<Vec<String>, AppError> {
        Ok((0..limit + 2)
            .map(|i| format!("https://web.example/{}/{}", query.len(), i))
            .collect())
    }

    async fn search_images(&self, _query: &str, _limit: usize) -> Result<Vec<String>, AppError> {
        Err(AppError::Search("image search down".to_string()))
    }
}

/// Helper to create a test app and its state
fn create_test_app(variant: AppVariant, with_model: bool) -> (Router, AppState) {
    let generator: Option<Arc<dyn Generator>> = if with_model {
        Some(Arc::new(FakeGenerator))
    } else {
        None
    };
    let state = AppState::new(variant, generator, Arc::new(FakeSearch), 3, "test-secret")
        .expect("state should build");
    (build_router(state.clone()), state)
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Register and log in, returning the session cookie
async fn register_and_login(app: &Router, username: &str, password: &str) -> String {
    let response = send(
        app,
        post_form(
            "/register",
            &format!("username={}&email=x%40x.com&password={}", username, password),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let response = send(
        app,
        post_form(
            "/login",
            &format!("username={}&password={}", username, password),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/chat");

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a session cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

fn docx_document(bytes: Vec<u8>) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut document = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut document)
        .unwrap();
    document
}

#[tokio::test]
async fn test_duplicate_registration_fails_and_keeps_first_record() {
    let (app, state) = create_test_app(AppVariant::References, true);
    register_and_login(&app, "alice", "first").await;

    let response = send(
        &app,
        post_form(
            "/register",
            "username=alice&email=other%40x.com&password=second",
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Username already exists"));

    assert!(state.authenticate("alice", "first").await);
    assert!(!state.authenticate("alice", "second").await);
    let guard = state.store.read().await;
    assert_eq!(guard.users.get("alice").unwrap().email, "x@x.com");
}

#[tokio::test]
async fn test_wrong_password_creates_no_session() {
    let (app, _) = create_test_app(AppVariant::References, true);
    register_and_login(&app, "alice", "pw").await;

    let response = send(
        &app,
        post_form("/login", "username=alice&password=nope", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert!(body_text(response)
        .await
        .contains("Invalid username or password"));
}

#[tokio::test]
async fn test_anonymous_access_is_gated() {
    let (app, _) = create_test_app(AppVariant::References, true);

    for uri in ["/", "/chat", "/download_chat"] {
        let response = send(&app, get(uri, None)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(location(&response), "/login", "{}", uri);
    }

    let response = send(&app, post_form("/get_response", "user_input=hi", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, post_form("/get_references", "index=0", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, get("/login", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_forged_cookie_is_rejected() {
    let (app, _) = create_test_app(AppVariant::References, true);
    register_and_login(&app, "alice", "pw").await;

    let response = send(&app, get("/chat", Some("username=alice"))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_logged_in_pages() {
    let (app, _) = create_test_app(AppVariant::References, true);
    let cookie = register_and_login(&app, "alice", "pw").await;

    let response = send(&app, get("/", Some(&cookie))).await;
    assert_eq!(location(&response), "/chat");

    let response = send(&app, get("/chat", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Hello, alice"));

    let response = send(&app, get("/contact", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_logout_clears_session_cookie() {
    let (app, _) = create_test_app(AppVariant::References, true);
    let cookie = register_and_login(&app, "alice", "pw").await;

    let response = send(&app, get("/logout", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("username="));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_get_response_appends_turn() {
    let (app, state) = create_test_app(AppVariant::References, true);
    let cookie = register_and_login(&app, "alice", "pw").await;

    let response = send(
        &app,
        post_form("/get_response", "user_input=hi", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["response"], "answer to hi");
    assert_eq!(json["index"], 0);
    assert_eq!(json["stored"], true);

    let turns = state.conversation("alice").await.unwrap();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].question, "hi");
}

#[tokio::test]
async fn test_get_response_without_user_input_replies_json() {
    let (app, state) = create_test_app(AppVariant::References, true);
    let cookie = register_and_login(&app, "alice", "pw").await;

    let response = send(&app, post_form("/get_response", "", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    let json = body_json(response).await;
    assert_eq!(json["response"], "answer to ");
    assert_eq!(json["index"], 0);

    assert_eq!(state.conversation("alice").await.unwrap()[0].question, "");
}

#[tokio::test]
async fn test_get_references() {
    let (app, state) = create_test_app(AppVariant::References, true);
    let cookie = register_and_login(&app, "alice", "pw").await;
    for question in ["one", "two"] {
        send(
            &app,
            post_form(
                "/get_response",
                &format!("user_input={}", question),
                Some(&cookie),
            ),
        )
        .await;
    }

    for bad in ["2", "-1", "abc", ""] {
        let response = send(
            &app,
            post_form("/get_references", &format!("index={}", bad), Some(&cookie)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "index {:?}", bad);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Invalid index" })
        );
    }
    assert!(state
        .conversation("alice")
        .await
        .unwrap()
        .iter()
        .all(|turn| turn.links.is_empty() && turn.images.is_empty()));

    let response = send(
        &app,
        post_form("/get_references", "index=1", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["links"].as_array().unwrap().len(), 3);
    assert_eq!(json["images"], serde_json::json!([]));

    let turns = state.conversation("alice").await.unwrap();
    assert!(turns[0].links.is_empty());
    assert_eq!(turns[1].links.len(), 3);
    assert_eq!(turns[1].links[0], "https://web.example/3/0");
}

#[tokio::test]
async fn test_bob_scenario_export_contains_question() {
    let (app, state) = create_test_app(AppVariant::References, true);
    let cookie = register_and_login(&app, "bob", "pw1").await;

    let response = send(
        &app,
        post_form("/get_response", "user_input=2%2B2%3F", Some(&cookie)),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["response"], "answer to 2+2?");
    assert_eq!(state.conversation("bob").await.unwrap().len(), 1);

    let response = send(&app, get("/download_chat", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"conversation_bob.docx\""
    );

    let document = docx_document(body_bytes(response).await);
    assert!(document.contains("Conversation History for bob"));
    assert!(document.contains("You: 2+2?"));
    assert!(document.contains("Bot: answer to 2+2?"));
}

#[tokio::test]
async fn test_export_empty_conversation() {
    let (app, _) = create_test_app(AppVariant::References, true);
    let cookie = register_and_login(&app, "carol", "pw").await;

    let response = send(&app, get("/download_chat", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let document = docx_document(body_bytes(response).await);
    assert!(document.contains("Conversation History for carol"));
    assert!(!document.contains("You: "));
}

#[tokio::test]
async fn test_basic_variant_surface() {
    let (app, state) = create_test_app(AppVariant::Basic, true);
    let cookie = register_and_login(&app, "alice", "pw").await;

    let response = send(
        &app,
        post_form("/get_response", "user_input=hi", Some(&cookie)),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["response"], "answer to hi");
    assert!(json.get("index").is_none());
    assert_eq!(state.conversation("alice").await.unwrap().len(), 1);

    let response = send(
        &app,
        post_form("/get_references", "index=0", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, get("/contact", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_basic_variant_without_model() {
    let (app, state) = create_test_app(AppVariant::Basic, false);
    let cookie = register_and_login(&app, "alice", "pw").await;

    let response = send(
        &app,
        post_form("/get_response", "user_input=hi", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["response"], MODEL_NOT_INITIALIZED);
    assert!(state.conversation("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = create_test_app(AppVariant::Basic, false);
    let response = send(&app, get("/api/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");
}
