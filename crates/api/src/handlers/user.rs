//! Handlers for the `/users` resource.

use axum::extract::{Path, State};
use axum::Json;
use mindnest_core::types::DbId;
use mindnest_db::models::user::UserResponse;
use mindnest_db::repositories::UserRepo;
use mindnest_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Return 404 unless the user exists.
pub async fn ensure_user_exists(pool: &DbPool, user_id: DbId) -> AppResult<()> {
    if UserRepo::exists(pool, user_id).await? {
        Ok(())
    } else {
        Err(AppError::not_found("User", user_id))
    }
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}
