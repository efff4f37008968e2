//! Handlers for the session request lifecycle.
//!
//! A request is created `PENDING` and answered exactly once by the
//! instructor. Accepting tries the meeting provider first (outside any
//! transaction), falls back to the caller's manual link, and then commits the
//! status change, the therapy session and the requester's notification
//! together.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mindnest_core::error::CoreError;
use mindnest_core::notification::TYPE_REQUEST_CREATED;
use mindnest_core::session_request::{
    ensure_pending, resolve_link, validate_manual_link, validate_new_request, validate_reason,
    MeetingMethod, RequestStatus,
};
use mindnest_core::therapy_session::resolve_duration;
use mindnest_core::types::{DbId, Timestamp};
use mindnest_db::models::notification::NewNotification;
use mindnest_db::models::session_request::{
    AcceptSessionRequest, AcceptedSession, CreateSessionRequest, NewSessionRequest,
    SessionRequest,
};
use mindnest_db::repositories::SessionRequestRepo;
use mindnest_db::DbPool;
use mindnest_meeting::{Meeting, MeetingRequest};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::instructor::find_instructor;
use crate::handlers::user::ensure_user_exists;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

/// Query parameters for the per-instructor and per-client listings.
#[derive(Debug, Deserialize)]
pub struct StatusFilter {
    /// Case-insensitive status name; all statuses when omitted.
    pub status: Option<String>,
}

impl StatusFilter {
    fn parse(&self) -> AppResult<Option<RequestStatus>> {
        self.status
            .as_deref()
            .map(RequestStatus::parse)
            .transpose()
            .map_err(AppError::from)
    }
}

/// Outcome of `POST /session-requests/{id}/accept`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptOutcome {
    pub success: bool,
    /// Link participants join with; `null` when no link is available.
    pub zoom_link: Option<String>,
    /// Host link, only present for provider-created meetings.
    pub start_link: Option<String>,
    pub method: MeetingMethod,
    pub request_id: DbId,
    pub session_id: DbId,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_request(pool: &DbPool, id: DbId) -> AppResult<SessionRequest> {
    SessionRequestRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("SessionRequest", id))
}

fn already_answered(id: DbId) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "Session request {id} has already been answered"
    )))
}

fn format_slot(at: Timestamp) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Ask the meeting provider for a meeting.
///
/// Failures are logged and swallowed: the caller falls back to the manual
/// link.
async fn create_provider_meeting(
    state: &AppState,
    request: &SessionRequest,
    duration_minutes: i32,
) -> Option<Meeting> {
    let meeting_request = MeetingRequest {
        topic: format!("Mindnest session #{}", request.id),
        start_time: request.requested_at,
        duration_minutes,
    };
    let provider = state.meeting_provider.name();

    match state.meeting_provider.create_meeting(&meeting_request).await {
        Ok(meeting) => Some(meeting),
        Err(e) => {
            tracing::warn!(
                request_id = request.id,
                provider,
                error = %e,
                "Meeting provider failed, falling back to manual link"
            );
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

/// POST /api/v1/session-requests
///
/// Submit a new request. Exactly one of `client_id` / `user_id` identifies
/// the requester. The instructor's linked user, if any, is notified.
pub async fn create_request(
    State(state): State<AppState>,
    Json(input): Json<CreateSessionRequest>,
) -> AppResult<impl IntoResponse> {
    let (instructor_id, requester) =
        validate_new_request(input.instructor_id, input.client_id, input.user_id)?;
    validate_reason(input.reason.as_deref())?;
    let requested_at = input.requested_at.ok_or_else(|| {
        AppError::Core(CoreError::Validation("requested_at is required".into()))
    })?;

    let instructor = find_instructor(&state.pool, instructor_id).await?;
    ensure_user_exists(&state.pool, requester.id()).await?;

    let notify = instructor.user_id.map(|user_id| NewNotification {
        user_id,
        notification_type: TYPE_REQUEST_CREATED.to_string(),
        title: "New session request".to_string(),
        message: format!(
            "A client requested a session for {}",
            format_slot(requested_at)
        ),
        related_id: None,
    });

    let request = SessionRequestRepo::create(
        &state.pool,
        &NewSessionRequest {
            instructor_id,
            requester,
            requested_at,
            reason: input.reason,
        },
        notify.as_ref(),
    )
    .await?;

    tracing::info!(
        request_id = request.id,
        instructor_id,
        requester_id = requester.id(),
        "Session request created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// GET /api/v1/session-requests
pub async fn list_requests(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<SessionRequest>>>> {
    let requests = SessionRequestRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// GET /api/v1/session-requests/{id}
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SessionRequest>>> {
    let request = find_request(&state.pool, id).await?;
    Ok(Json(DataResponse { data: request }))
}

/// GET /api/v1/instructors/{id}/session-requests
pub async fn list_for_instructor(
    State(state): State<AppState>,
    Path(instructor_id): Path<DbId>,
    Query(filter): Query<StatusFilter>,
) -> AppResult<Json<DataResponse<Vec<SessionRequest>>>> {
    let status = filter.parse()?;
    find_instructor(&state.pool, instructor_id).await?;

    let requests = SessionRequestRepo::list_for_instructor(
        &state.pool,
        instructor_id,
        status.map(RequestStatus::as_str),
    )
    .await?;
    Ok(Json(DataResponse { data: requests }))
}

/// GET /api/v1/clients/{id}/session-requests
///
/// Requests where the user is the requester, whichever column identifies
/// them.
pub async fn list_for_client(
    State(state): State<AppState>,
    Path(client_id): Path<DbId>,
    Query(filter): Query<StatusFilter>,
) -> AppResult<Json<DataResponse<Vec<SessionRequest>>>> {
    let status = filter.parse()?;
    ensure_user_exists(&state.pool, client_id).await?;

    let requests = SessionRequestRepo::list_for_requester(
        &state.pool,
        client_id,
        status.map(RequestStatus::as_str),
    )
    .await?;
    Ok(Json(DataResponse { data: requests }))
}

// ---------------------------------------------------------------------------
// Accept / decline
// ---------------------------------------------------------------------------

/// POST /api/v1/session-requests/{id}/accept
///
/// Body (optional): `{ "manual_link": "...", "duration_minutes": 45 }`.
/// Answers 409 when the request is no longer `PENDING`, including when a
/// concurrent accept or decline wins the race.
pub async fn accept_request(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Option<Json<AcceptSessionRequest>>,
) -> AppResult<Json<DataResponse<AcceptOutcome>>> {
    let input = body.map(|Json(b)| b).unwrap_or_default();

    let request = find_request(&state.pool, id).await?;
    ensure_pending(id, &request.status)?;
    validate_manual_link(input.manual_link.as_deref())?;
    let duration_minutes =
        resolve_duration(input.duration_minutes, state.config.default_meeting_minutes)?;

    let meeting = create_provider_meeting(&state, &request, duration_minutes).await;
    let link = resolve_link(
        meeting.as_ref().map(|m| (m.join_url.clone(), m.start_url.clone())),
        input.manual_link.as_deref(),
    );

    let notification_message = match &link.join_url {
        Some(url) => format!(
            "Your session on {} was accepted. Join here: {url}",
            format_slot(request.requested_at)
        ),
        None => format!(
            "Your session on {} was accepted. The meeting link will be shared separately.",
            format_slot(request.requested_at)
        ),
    };

    let accepted = AcceptedSession {
        meeting_link: link.join_url.clone(),
        start_link: link.start_url.clone(),
        creation_method: link.method.as_str().to_string(),
        duration_minutes,
        notification_title: "Session request accepted".to_string(),
        notification_message,
    };

    let Some((request, session)) = SessionRequestRepo::accept(&state.pool, id, &accepted).await?
    else {
        if let Some(meeting) = &meeting {
            tracing::warn!(
                request_id = id,
                provider = state.meeting_provider.name(),
                external_id = ?meeting.external_id,
                join_url = %meeting.join_url,
                "Request answered concurrently, provider meeting left orphaned"
            );
        }
        return Err(already_answered(id));
    };

    tracing::info!(
        request_id = request.id,
        session_id = session.id,
        instructor_id = request.instructor_id,
        method = link.method.as_str(),
        "Session request accepted"
    );

    Ok(Json(DataResponse {
        data: AcceptOutcome {
            success: true,
            zoom_link: link.join_url,
            start_link: link.start_url,
            method: link.method,
            request_id: request.id,
            session_id: session.id,
        },
    }))
}

/// POST /api/v1/session-requests/{id}/decline
///
/// Decline a pending request and notify the requester. No therapy session is
/// created.
pub async fn decline_request(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SessionRequest>>> {
    let request = find_request(&state.pool, id).await?;
    ensure_pending(id, &request.status)?;

    let message = format!(
        "Your session request for {} was declined.",
        format_slot(request.requested_at)
    );
    let request = SessionRequestRepo::decline(&state.pool, id, "Session request declined", &message)
        .await?
        .ok_or_else(|| already_answered(id))?;

    tracing::info!(
        request_id = request.id,
        instructor_id = request.instructor_id,
        "Session request declined"
    );

    Ok(Json(DataResponse { data: request }))
}
