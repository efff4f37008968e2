//! Instructor and client dashboards.
//!
//! Every figure is counted from the store when the endpoint is called; there
//! is no cached or incrementally maintained state.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use mindnest_core::dashboard::{
    average_rating, day_window, reference_date, week_window, UPCOMING_SESSIONS_LIMIT,
};
use mindnest_core::types::{DbId, Timestamp};
use mindnest_db::models::dashboard::{ClientCounts, InstructorCounts};
use mindnest_db::models::therapy_session::UpcomingSession;
use mindnest_db::repositories::{
    DashboardRepo, MessageRepo, NotificationRepo, TherapySessionRepo,
};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::instructor::find_instructor;
use crate::handlers::user::ensure_user_exists;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters shared by both dashboards.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// `YYYY-MM-DD` to use instead of today's UTC date.
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InstructorDashboard {
    pub instructor_id: DbId,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub counts: InstructorCounts,
    /// Unread messages of the linked user account; 0 when unlinked.
    pub unread_messages: i64,
    pub average_rating: Option<f64>,
    pub upcoming_sessions: Vec<UpcomingSession>,
}

#[derive(Debug, Serialize)]
pub struct ClientDashboard {
    pub client_id: DbId,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub counts: ClientCounts,
    pub unread_notifications: i64,
    pub unread_messages: i64,
}

/// GET /api/v1/instructors/{id}/dashboard?date=YYYY-MM-DD
pub async fn instructor_dashboard(
    State(state): State<AppState>,
    Path(instructor_id): Path<DbId>,
    Query(params): Query<DashboardQuery>,
) -> AppResult<Json<DataResponse<InstructorDashboard>>> {
    let now = Utc::now();
    let date = reference_date(params.date.as_deref(), now.date_naive())?;
    let instructor = find_instructor(&state.pool, instructor_id).await?;

    let counts = DashboardRepo::instructor_counts(
        &state.pool,
        instructor_id,
        day_window(date)?,
        week_window(date)?,
    )
    .await?;

    let unread_messages = match instructor.user_id {
        Some(user_id) => MessageRepo::unread_count(&state.pool, user_id).await?,
        None => 0,
    };

    let ratings = TherapySessionRepo::ratings_for_instructor(&state.pool, instructor_id).await?;
    let upcoming_sessions = TherapySessionRepo::upcoming_for_instructor(
        &state.pool,
        instructor_id,
        now,
        UPCOMING_SESSIONS_LIMIT,
    )
    .await?;

    tracing::debug!(
        instructor_id,
        %date,
        pending = counts.pending_requests,
        "Instructor dashboard computed"
    );

    Ok(Json(DataResponse {
        data: InstructorDashboard {
            instructor_id,
            date,
            counts,
            unread_messages,
            average_rating: average_rating(&ratings),
            upcoming_sessions,
        },
    }))
}

/// GET /api/v1/clients/{id}/dashboard?date=YYYY-MM-DD
///
/// With `date`, "upcoming" counts sessions from the start of that day;
/// otherwise from now.
pub async fn client_dashboard(
    State(state): State<AppState>,
    Path(client_id): Path<DbId>,
    Query(params): Query<DashboardQuery>,
) -> AppResult<Json<DataResponse<ClientDashboard>>> {
    let now = Utc::now();
    let date = reference_date(params.date.as_deref(), now.date_naive())?;
    ensure_user_exists(&state.pool, client_id).await?;

    let from: Timestamp = if params.date.is_some() {
        day_window(date)?.start
    } else {
        now
    };

    let counts = DashboardRepo::client_counts(&state.pool, client_id, from).await?;
    let unread_notifications = NotificationRepo::unread_count(&state.pool, client_id).await?;
    let unread_messages = MessageRepo::unread_count(&state.pool, client_id).await?;

    Ok(Json(DataResponse {
        data: ClientDashboard {
            client_id,
            date,
            counts,
            unread_notifications,
            unread_messages,
        },
    }))
}
