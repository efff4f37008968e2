//! HTTP-level tests for the session request lifecycle.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with_provider, create_instructor, create_request,
    get, post_empty, post_json, register_user, FakeProvider,
};
use mindnest_db::repositories::SessionRequestRepo;
use mindnest_meeting::{Meeting, MeetingError, MeetingProvider, MeetingRequest};
use serde_json::json;
use sqlx::PgPool;

const SLOT: &str = "2030-03-04T10:00:00Z";

async fn session_count(pool: &PgPool, request_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM therapy_sessions WHERE session_request_id = $1")
        .bind(request_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Instructor 5 and client 9 with explicit ids, as an operator would see
/// them in an existing database.
async fn seed_fixed_ids(pool: &PgPool) {
    sqlx::query(
        "INSERT INTO users (id, username, full_name, password_hash, role)
         VALUES (9, 'client9', 'Client Nine', 'x', 'CLIENT')",
    )
    .execute(pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO instructors (id, full_name) VALUES (5, 'Instructor Five')")
        .execute(pool)
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_returns_pending_request(pool: PgPool) {
    let client = register_user(&pool, "casey", "CLIENT").await;
    let instructor = create_instructor(&pool, None).await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/session-requests",
        json!({
            "instructor_id": instructor,
            "client_id": client,
            "requested_at": SLOT,
            "reason": "Trouble sleeping",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "PENDING");
    assert_eq!(json["data"]["client_id"], client);
    assert!(json["data"]["user_id"].is_null());
    assert!(json["data"]["meeting_link"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_notifies_linked_instructor(pool: PgPool) {
    let client = register_user(&pool, "casey", "CLIENT").await;
    let instructor_user = register_user(&pool, "drcole", "INSTRUCTOR").await;
    let instructor = create_instructor(&pool, Some(instructor_user)).await;

    create_request(&pool, instructor, client, SLOT).await;

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/users/{instructor_user}/notifications/unread-count"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["count"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_requires_exactly_one_requester(pool: PgPool) {
    let client = register_user(&pool, "casey", "CLIENT").await;
    let instructor = create_instructor(&pool, None).await;

    for body in [
        json!({ "instructor_id": instructor, "requested_at": SLOT }),
        json!({
            "instructor_id": instructor,
            "client_id": client,
            "user_id": client,
            "requested_at": SLOT,
        }),
    ] {
        let response = post_json(build_test_app(pool.clone()), "/api/v1/session-requests", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_requires_instructor_and_time(pool: PgPool) {
    let client = register_user(&pool, "casey", "CLIENT").await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/session-requests",
        json!({ "client_id": client, "requested_at": SLOT }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let instructor = create_instructor(&pool, None).await;
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/session-requests",
        json!({ "instructor_id": instructor, "client_id": client }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_for_unknown_instructor_is_not_found(pool: PgPool) {
    let client = register_user(&pool, "casey", "CLIENT").await;

    let response = post_json(
        build_test_app(pool),
        "/api/v1/session-requests",
        json!({ "instructor_id": 999, "client_id": client, "requested_at": SLOT }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn instructor_listing_filters_by_status(pool: PgPool) {
    let client = register_user(&pool, "casey", "CLIENT").await;
    let instructor = create_instructor(&pool, None).await;
    let first = create_request(&pool, instructor, client, SLOT).await;
    create_request(&pool, instructor, client, "2030-03-05T10:00:00Z").await;

    post_empty(
        build_test_app(pool.clone()),
        &format!("/api/v1/session-requests/{first}/decline"),
    )
    .await;

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/instructors/{instructor}/session-requests?status=pending"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["status"], "PENDING");

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/clients/{client}/session-requests"),
    )
    .await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);

    let response = get(
        build_test_app(pool),
        &format!("/api/v1/instructors/{instructor}/session-requests?status=maybe"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Accept
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn accept_falls_back_to_manual_link(pool: PgPool) {
    seed_fixed_ids(&pool).await;
    let request = create_request(&pool, 5, 9, SLOT).await;
    let provider = FakeProvider::failing();

    let response = post_json(
        build_test_app_with_provider(pool.clone(), provider.clone()),
        &format!("/api/v1/session-requests/{request}/accept"),
        json!({ "manual_link": "https://meet/x" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["success"], true);
    assert_eq!(json["data"]["zoomLink"], "https://meet/x");
    assert_eq!(json["data"]["method"], "manual");
    assert_eq!(provider.call_count(), 1);

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/session-requests/{request}"),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "ACCEPTED");
    assert_eq!(json["data"]["meeting_link"], "https://meet/x");

    let (instructor_id, client_id, method): (i64, i64, String) = sqlx::query_as(
        "SELECT instructor_id, client_id, creation_method
         FROM therapy_sessions WHERE session_request_id = $1",
    )
    .bind(request)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!((instructor_id, client_id), (5, 9));
    assert_eq!(method, "manual");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn accept_prefers_provider_meeting(pool: PgPool) {
    let client = register_user(&pool, "casey", "CLIENT").await;
    let instructor = create_instructor(&pool, None).await;
    let request = create_request(&pool, instructor, client, SLOT).await;

    let response = post_json(
        build_test_app_with_provider(pool.clone(), FakeProvider::succeeding()),
        &format!("/api/v1/session-requests/{request}/accept"),
        json!({ "manual_link": "https://meet/ignored", "duration_minutes": 45 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["method"], "api");
    assert_eq!(json["data"]["zoomLink"], "https://zoom.test/j/45");
    assert_eq!(json["data"]["startLink"], "https://zoom.test/s/host");

    let session_id = json["data"]["sessionId"].as_i64().unwrap();
    let response = get(build_test_app(pool), &format!("/api/v1/sessions/{session_id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["duration_minutes"], 45);
    assert_eq!(json["data"]["status"], "SCHEDULED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn accept_without_any_link(pool: PgPool) {
    let client = register_user(&pool, "casey", "CLIENT").await;
    let instructor = create_instructor(&pool, None).await;
    let request = create_request(&pool, instructor, client, SLOT).await;

    let response = post_empty(
        build_test_app(pool.clone()),
        &format!("/api/v1/session-requests/{request}/accept"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["method"], "none");
    assert!(json["data"]["zoomLink"].is_null());
    assert_eq!(session_count(&pool, request).await, 1);

    let response = get(
        build_test_app(pool),
        &format!("/api/v1/users/{client}/notifications?unread_only=true"),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["notification_type"], "session_request.accepted");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_accept_conflicts(pool: PgPool) {
    let client = register_user(&pool, "casey", "CLIENT").await;
    let instructor = create_instructor(&pool, None).await;
    let request = create_request(&pool, instructor, client, SLOT).await;
    let uri = format!("/api/v1/session-requests/{request}/accept");

    let first = post_empty(build_test_app(pool.clone()), &uri).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_empty(build_test_app(pool.clone()), &uri).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["code"], "CONFLICT");
    assert_eq!(session_count(&pool, request).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn accept_rejects_bad_input(pool: PgPool) {
    let client = register_user(&pool, "casey", "CLIENT").await;
    let instructor = create_instructor(&pool, None).await;
    let request = create_request(&pool, instructor, client, SLOT).await;
    let uri = format!("/api/v1/session-requests/{request}/accept");

    let response = post_json(
        build_test_app(pool.clone()),
        &uri,
        json!({ "manual_link": "ftp://files" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        build_test_app(pool.clone()),
        &uri,
        json!({ "duration_minutes": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_empty(build_test_app(pool.clone()), "/api/v1/session-requests/999/accept").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(session_count(&pool, request).await, 0);
}

// ---------------------------------------------------------------------------
// Decline
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn decline_is_final(pool: PgPool) {
    let client = register_user(&pool, "casey", "CLIENT").await;
    let instructor = create_instructor(&pool, None).await;
    let request = create_request(&pool, instructor, client, SLOT).await;

    let response = post_empty(
        build_test_app(pool.clone()),
        &format!("/api/v1/session-requests/{request}/decline"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "DECLINED");

    let provider = FakeProvider::succeeding();
    let response = post_empty(
        build_test_app_with_provider(pool.clone(), provider.clone()),
        &format!("/api/v1/session-requests/{request}/accept"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(provider.call_count(), 0);
    assert_eq!(session_count(&pool, request).await, 0);

    let response = post_empty(
        build_test_app(pool),
        &format!("/api/v1/session-requests/{request}/decline"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_accepts_have_one_winner(pool: PgPool) {
    let client = register_user(&pool, "casey", "CLIENT").await;
    let instructor = create_instructor(&pool, None).await;
    let request = create_request(&pool, instructor, client, SLOT).await;
    let uri = format!("/api/v1/session-requests/{request}/accept");
    let provider: Arc<FakeProvider> = FakeProvider::succeeding();

    let (a, b) = tokio::join!(
        post_empty(build_test_app_with_provider(pool.clone(), provider.clone()), &uri),
        post_empty(build_test_app_with_provider(pool.clone(), provider.clone()), &uri),
    );

    let mut statuses = [a.status(), b.status()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT]);
    assert_eq!(session_count(&pool, request).await, 1);
}

/// Provider that declines the request while the meeting is being created,
/// as an instructor answering from another tab would.
struct DecliningProvider {
    pool: PgPool,
    request_id: i64,
}

#[async_trait]
impl MeetingProvider for DecliningProvider {
    fn name(&self) -> &'static str {
        "declining"
    }

    async fn create_meeting(&self, _request: &MeetingRequest) -> Result<Meeting, MeetingError> {
        SessionRequestRepo::decline(&self.pool, self.request_id, "Declined", "Declined")
            .await
            .unwrap()
            .expect("request should still be pending");
        Ok(Meeting {
            join_url: "https://zoom.test/j/orphan".to_string(),
            start_url: None,
            external_id: Some("77".to_string()),
        })
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn accept_losing_race_after_meeting_created_conflicts(pool: PgPool) {
    let client = register_user(&pool, "casey", "CLIENT").await;
    let instructor = create_instructor(&pool, None).await;
    let request = create_request(&pool, instructor, client, SLOT).await;
    let provider = Arc::new(DecliningProvider {
        pool: pool.clone(),
        request_id: request,
    });

    let response = post_empty(
        build_test_app_with_provider(pool.clone(), provider),
        &format!("/api/v1/session-requests/{request}/accept"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(session_count(&pool, request).await, 0);

    let response = get(
        build_test_app(pool),
        &format!("/api/v1/session-requests/{request}"),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "DECLINED");
    assert!(json["data"]["meeting_link"].is_null());
}
