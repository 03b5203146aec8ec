use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{
        Request, StatusCode,
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
    },
    response::Response,
};
use http_body_util::BodyExt;
use lumen_core::{AppState, Settings};
use lumen_database::{MemoryStore, UserStore};
use lumen_llm::{CompletionRequest, ContentGenerator, GenerationError};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{ROUTES, router};

struct Scripted;

#[async_trait]
impl ContentGenerator for Scripted {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
        if request.prompt.contains("'Broken'") {
            return Err(GenerationError::Provider("rate limit exceeded".to_owned()));
        }
        Ok(format!("explained: {}", request.prompt))
    }
}

fn app() -> (MemoryStore, Router) {
    app_with(Settings::default())
}

fn app_with(settings: Settings) -> (MemoryStore, Router) {
    let store = MemoryStore::new();
    let state = AppState::new(store.clone(), settings).with_llm(Arc::new(Scripted));
    (store, router(state))
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn form(path: &str, body: &str) -> Request<Body> {
    Request::post(path)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

fn json_post(path: &str, cookie: &str, body: Value) -> Request<Body> {
    Request::post(path)
        .header(CONTENT_TYPE, "application/json")
        .header(COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(path);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// The `name=value` part of the response's `Set-Cookie`, if any.
fn cookie_pair(response: &Response) -> Option<String> {
    response
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_owned)
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

async fn signup(app: &Router, username: &str, password: &str) -> String {
    let response = send(
        app,
        form("/signup", &format!("username={username}&password={password}")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/");
    cookie_pair(&response).unwrap()
}

#[tokio::test]
async fn completing_a_node_awards_xp_once() {
    let (_store, app) = app();
    let cookie = signup(&app, "alice", "pw123").await;

    let first = send(
        &app,
        json_post("/api/complete_node", &cookie, json!({ "node_id": "intro" })),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(
        body_json(first).await,
        json!({ "success": true, "xp": 50, "message": "XP Added!" })
    );

    let second = send(
        &app,
        json_post("/api/complete_node", &cookie, json!({ "node_id": "intro" })),
    )
    .await;
    assert_eq!(
        body_json(second).await,
        json!({ "success": true, "xp": 50, "message": "Already completed." })
    );
}

#[tokio::test]
async fn missing_node_id_is_rejected_without_mutation() {
    let (store, app) = app();
    let cookie = signup(&app, "alice", "pw123").await;

    let response = send(&app, json_post("/api/complete_node", &cookie, json!({}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "Missing node_id" }));

    let user = store.find_user_by_username("alice").await.unwrap().unwrap();
    assert_eq!(user.xp, 0);
    assert!(user.completed_nodes.is_empty());
}

#[tokio::test]
async fn strict_mode_rejects_unknown_nodes() {
    let (store, app) = app_with(Settings {
        strict_node_ids: true,
        ..Settings::default()
    });
    let cookie = signup(&app, "alice", "pw123").await;

    let response = send(
        &app,
        json_post("/api/complete_node", &cookie, json!({ "node_id": "quantum" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let user = store.find_user_by_username("alice").await.unwrap().unwrap();
    assert_eq!(user.xp, 0);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (_store, app) = app();
    let cookie = signup(&app, "alice", "pw123").await;

    let request = Request::post("/api/complete_node")
        .header(CONTENT_TYPE, "application/json")
        .header(COOKIE, &cookie)
        .body(Body::from("{not json"))
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[tokio::test]
async fn guarded_routes_redirect_to_login() {
    let (_store, app) = app();

    for route in ROUTES.iter().filter(|route| route.requires_session) {
        let request = Request::builder()
            .method(route.method)
            .uri(route.path)
            .body(Body::empty())
            .unwrap();
        let response = send(&app, request).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", route.path);
        assert_eq!(response.headers()[LOCATION], "/login", "{}", route.path);
    }
}

#[tokio::test]
async fn forged_session_cookie_is_not_accepted() {
    let (_store, app) = app();
    let forged = format!("lumen_session={}", "ab".repeat(32));

    let response = send(&app, get("/", Some(&forged))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/login");
}

#[tokio::test]
async fn duplicate_signup_rerenders_form_without_session() {
    let (store, app) = app();
    signup(&app, "alice", "pw123").await;

    let response = send(&app, form("/signup", "username=alice&password=other")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(cookie_pair(&response).is_none());
    assert!(body_text(response).await.contains("Username already exists."));

    assert_eq!(store.user_count().await, 1);
    assert_eq!(store.session_count().await, 1);
}

#[tokio::test]
async fn empty_signup_fields_rerender_form() {
    let (store, app) = app();

    let response = send(&app, form("/signup", "username=&password=")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Missing username or password"));
    assert_eq!(store.user_count().await, 0);
}

#[tokio::test]
async fn overlong_username_rerenders_signup_form() {
    let (store, app) = app();
    let name = "x".repeat(151);

    let response = send(&app, form("/signup", &format!("username={name}&password=pw123"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(cookie_pair(&response).is_none());
    assert!(
        body_text(response)
            .await
            .contains("Username must be at most 150 characters.")
    );
    assert_eq!(store.user_count().await, 0);
}

#[tokio::test]
async fn wrong_password_rerenders_login_without_session() {
    let (store, app) = app();
    signup(&app, "alice", "pw123").await;

    let response = send(&app, form("/login", "username=alice&password=nope")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(cookie_pair(&response).is_none());
    assert!(
        body_text(response)
            .await
            .contains("Login Failed. Check your username and password.")
    );
    assert_eq!(store.session_count().await, 1);
}

#[tokio::test]
async fn login_then_logout_invalidates_session() {
    let (_store, app) = app();
    signup(&app, "alice", "pw123").await;

    let response = send(&app, form("/login", "username=alice&password=pw123")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookie = cookie_pair(&response).unwrap();

    let index = send(&app, get("/", Some(&cookie))).await;
    assert_eq!(index.status(), StatusCode::OK);
    let page = body_text(index).await;
    assert!(page.contains("alice"));
    assert!(page.contains("0 XP"));

    let logout = send(&app, get("/logout", Some(&cookie))).await;
    assert_eq!(logout.status(), StatusCode::SEE_OTHER);
    assert_eq!(logout.headers()[LOCATION], "/login");
    assert_eq!(cookie_pair(&logout).as_deref(), Some("lumen_session="));

    let after = send(&app, get("/", Some(&cookie))).await;
    assert_eq!(after.status(), StatusCode::SEE_OTHER);
    assert_eq!(after.headers()[LOCATION], "/login");
}

#[tokio::test]
async fn logout_without_session_still_redirects() {
    let (_store, app) = app();
    let response = send(&app, get("/logout", None)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/login");
}

#[tokio::test]
async fn generate_returns_provider_text() {
    let (_store, app) = app();
    let cookie = signup(&app, "alice", "pw123").await;

    let response = send(
        &app,
        json_post(
            "/api/generate",
            &cookie,
            json!({ "node_title": "Gradient Descent", "mode": "eli5" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let content = body["content"].as_str().unwrap();
    assert!(content.starts_with("explained: "));
    assert!(content.contains("'Gradient Descent'"));
    assert!(content.contains("12-year-old"));
}

#[tokio::test]
async fn generate_rejects_bad_requests() {
    let (_store, app) = app();
    let cookie = signup(&app, "alice", "pw123").await;

    let unknown_mode = send(
        &app,
        json_post(
            "/api/generate",
            &cookie,
            json!({ "node_title": "CNNs", "mode": "haiku" }),
        ),
    )
    .await;
    assert_eq!(unknown_mode.status(), StatusCode::BAD_REQUEST);

    let missing = send(
        &app,
        json_post("/api/generate", &cookie, json!({ "mode": "eli5" })),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(missing).await,
        json!({ "error": "Missing node_title or mode" })
    );
}

#[tokio::test]
async fn generate_surfaces_provider_failure() {
    let (_store, app) = app();
    let cookie = signup(&app, "alice", "pw123").await;

    let response = send(
        &app,
        json_post(
            "/api/generate",
            &cookie,
            json!({ "node_title": "Broken", "mode": "code" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "rate limit exceeded" })
    );
}

#[tokio::test]
async fn generate_without_provider_reports_unconfigured() {
    let store = MemoryStore::new();
    let app = router(AppState::new(store, Settings::default()));
    let cookie = signup(&app, "alice", "pw123").await;

    let response = send(
        &app,
        json_post(
            "/api/generate",
            &cookie,
            json!({ "node_title": "CNNs", "mode": "theory" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "content generation is not configured" })
    );
}

#[tokio::test]
async fn roadmap_reports_completion_flags() {
    let (_store, app) = app();
    let cookie = signup(&app, "alice", "pw123").await;
    send(
        &app,
        json_post("/api/complete_node", &cookie, json!({ "node_id": "svm" })),
    )
    .await;

    let response = send(&app, get("/api/roadmap", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["xp"], 50);
    assert_eq!(body["streak"], 1);
    let levels = body["levels"].as_array().unwrap();
    assert_eq!(levels.len(), 4);

    let nodes: Vec<&Value> = levels
        .iter()
        .flat_map(|level| level["nodes"].as_array().unwrap())
        .collect();
    assert_eq!(nodes.len(), 13);
    for node in nodes {
        assert_eq!(node["completed"], node["id"] == "svm");
    }
}

#[tokio::test]
async fn healthz_needs_no_session() {
    let (_store, app) = app();
    let response = send(&app, get("/healthz", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}
