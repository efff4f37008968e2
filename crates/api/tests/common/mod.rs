#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use mindnest_api::config::ServerConfig;
use mindnest_api::router::build_app_router;
use mindnest_api::state::AppState;
use mindnest_meeting::{DisabledProvider, Meeting, MeetingError, MeetingProvider, MeetingRequest};
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults and no Zoom credentials.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        session_ttl_hours: 24,
        default_meeting_minutes: 60,
        zoom: None,
    }
}

/// Full application router backed by `pool`, with meetings disabled.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_provider(pool, Arc::new(DisabledProvider))
}

/// Full application router with a custom meeting provider.
pub fn build_test_app_with_provider(pool: PgPool, provider: Arc<dyn MeetingProvider>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        meeting_provider: provider,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fake meeting provider
// ---------------------------------------------------------------------------

/// Meeting provider that either always succeeds or always fails, and
/// counts how often it was called.
pub struct FakeProvider {
    succeed: bool,
    pub calls: AtomicUsize,
}

impl FakeProvider {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            succeed: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            succeed: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MeetingProvider for FakeProvider {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn create_meeting(&self, request: &MeetingRequest) -> Result<Meeting, MeetingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.succeed {
            return Err(MeetingError::Api {
                status: 503,
                body: "provider unavailable".to_string(),
            });
        }
        Ok(Meeting {
            join_url: format!("https://zoom.test/j/{}", request.duration_minutes),
            start_url: Some("https://zoom.test/s/host".to_string()),
            external_id: Some("42".to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: Method, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, &body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, &body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Register a user through the API and return its id.
pub async fn register_user(pool: &PgPool, username: &str, role: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/auth/register",
        serde_json::json!({
            "username": username,
            "password": "correct-horse-battery",
            "full_name": format!("{username} Example"),
            "email": format!("{username}@example.com"),
            "role": role,
        }),
    )
    .await;
    assert_eq!(response.status(), 201, "registration of {username} failed");
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create an instructor profile through the API and return its id.
pub async fn create_instructor(pool: &PgPool, user_id: Option<i64>) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/instructors",
        serde_json::json!({
            "user_id": user_id,
            "full_name": "Dr. Imani Cole",
            "specialization": "Anxiety",
        }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Submit a session request for `client_id` and return its id.
pub async fn create_request(pool: &PgPool, instructor_id: i64, client_id: i64, at: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/session-requests",
        serde_json::json!({
            "instructor_id": instructor_id,
            "client_id": client_id,
            "requested_at": at,
            "reason": "Stress at work",
        }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
