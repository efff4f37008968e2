//! Handlers for therapy sessions created from accepted requests.

use axum::extract::{Path, State};
use axum::Json;
use mindnest_core::error::CoreError;
use mindnest_core::therapy_session::{validate_rating, validate_transition};
use mindnest_core::types::DbId;
use mindnest_db::models::therapy_session::{RateSession, TherapySession, UpdateSessionStatus};
use mindnest_db::repositories::TherapySessionRepo;
use mindnest_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::handlers::instructor::find_instructor;
use crate::handlers::user::ensure_user_exists;
use crate::response::DataResponse;
use crate::state::AppState;

async fn find_session(pool: &DbPool, id: DbId) -> AppResult<TherapySession> {
    TherapySessionRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("TherapySession", id))
}

fn changed_concurrently(id: DbId) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "Therapy session {id} was modified concurrently"
    )))
}

/// GET /api/v1/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TherapySession>>> {
    let session = find_session(&state.pool, id).await?;
    Ok(Json(DataResponse { data: session }))
}

/// PUT /api/v1/sessions/{id}/status
///
/// Complete or cancel a scheduled session.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSessionStatus>,
) -> AppResult<Json<DataResponse<TherapySession>>> {
    let session = find_session(&state.pool, id).await?;
    let next = input.status.trim().to_ascii_uppercase();
    validate_transition(&session.status, &next)?;

    let updated = TherapySessionRepo::update_status(
        &state.pool,
        id,
        &session.status,
        &next,
        input.notes.as_deref(),
    )
    .await?
    .ok_or_else(|| changed_concurrently(id))?;

    tracing::info!(
        session_id = id,
        from = %session.status,
        to = %updated.status,
        "Therapy session status updated"
    );

    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/sessions/{id}/rating
///
/// Rate a completed session once, 1 to 5.
pub async fn rate_session(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RateSession>,
) -> AppResult<Json<DataResponse<TherapySession>>> {
    let session = find_session(&state.pool, id).await?;
    validate_rating(&session.status, session.rating, input.rating)?;

    let rated = TherapySessionRepo::set_rating(
        &state.pool,
        id,
        input.rating,
        input.feedback.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::Core(CoreError::Conflict("Session has already been rated".into())))?;

    tracing::info!(session_id = id, rating = input.rating, "Therapy session rated");

    Ok(Json(DataResponse { data: rated }))
}

/// GET /api/v1/instructors/{id}/sessions
pub async fn list_for_instructor(
    State(state): State<AppState>,
    Path(instructor_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TherapySession>>>> {
    find_instructor(&state.pool, instructor_id).await?;
    let sessions = TherapySessionRepo::list_for_instructor(&state.pool, instructor_id).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// GET /api/v1/clients/{id}/sessions
pub async fn list_for_client(
    State(state): State<AppState>,
    Path(client_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TherapySession>>>> {
    ensure_user_exists(&state.pool, client_id).await?;
    let sessions = TherapySessionRepo::list_for_client(&state.pool, client_id).await?;
    Ok(Json(DataResponse { data: sessions }))
}
