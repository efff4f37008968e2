//! Handlers for the `/instructors` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mindnest_core::error::CoreError;
use mindnest_core::types::DbId;
use mindnest_db::models::instructor::{CreateInstructor, Instructor};
use mindnest_db::repositories::InstructorRepo;
use mindnest_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::handlers::user::ensure_user_exists;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load an instructor or return 404.
pub async fn find_instructor(pool: &DbPool, id: DbId) -> AppResult<Instructor> {
    InstructorRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Instructor", id))
}

/// GET /api/v1/instructors
pub async fn list_instructors(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Instructor>>>> {
    let instructors = InstructorRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: instructors }))
}

/// POST /api/v1/instructors
///
/// Create an instructor profile, optionally linked to a user account.
/// Linking a user that already has a profile returns 409.
pub async fn create_instructor(
    State(state): State<AppState>,
    Json(input): Json<CreateInstructor>,
) -> AppResult<impl IntoResponse> {
    if input.full_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "full_name must not be empty".into(),
        )));
    }
    if let Some(user_id) = input.user_id {
        ensure_user_exists(&state.pool, user_id).await?;
    }

    let instructor = InstructorRepo::create(&state.pool, &input).await?;

    tracing::info!(
        instructor_id = instructor.id,
        user_id = ?instructor.user_id,
        "Instructor created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: instructor })))
}

/// GET /api/v1/instructors/{id}
pub async fn get_instructor(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Instructor>>> {
    let instructor = find_instructor(&state.pool, id).await?;
    Ok(Json(DataResponse { data: instructor }))
}
