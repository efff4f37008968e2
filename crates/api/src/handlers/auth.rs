//! Handlers for the `/auth` resource (register, login, logout, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use mindnest_core::error::CoreError;
use mindnest_core::identity::NewAccount;
use mindnest_core::session::{session_expiry, SessionContext};
use mindnest_core::types::Timestamp;
use mindnest_db::models::session::CreateSession;
use mindnest_db::models::user::{CreateUser, UserResponse};
use mindnest_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::generate_session_token;
use crate::error::{AppError, AppResult};
use crate::middleware::session::CurrentSession;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Opaque bearer token. Only its hash is stored server-side.
    pub token: String,
    pub expires_at: Timestamp,
    pub user: UserResponse,
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid username or password".into(),
    ))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account. The role defaults to `CLIENT`.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<NewAccount>,
) -> AppResult<impl IntoResponse> {
    let role = input.validate_account()?;

    if UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Username '{}' is already taken",
            input.username
        ))));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            full_name: input.full_name,
            email: input.email,
            password_hash,
            role: role.as_str().to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, role = role.as_str(), "User registered");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(user),
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Verify credentials and open a login session.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<LoginResponse>>> {
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(invalid_credentials());
    }

    let (token, token_hash) = generate_session_token();
    let expires_at = session_expiry(Utc::now(), state.config.session_ttl_hours)
        .map_err(|e| AppError::InternalError(format!("Session expiry error: {e}")))?;

    let session = SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            token_hash,
            expires_at,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, session_id = session.id, "User logged in");

    Ok(Json(DataResponse {
        data: LoginResponse {
            token,
            expires_at: session.expires_at,
            user: UserResponse::from(user),
        },
    }))
}

/// POST /api/v1/auth/logout
///
/// Revoke the current session. Returns 204 No Content.
pub async fn logout(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<StatusCode> {
    SessionRepo::revoke(&state.pool, session.session_id).await?;
    tracing::info!(
        user_id = session.user_id,
        session_id = session.session_id,
        "User logged out"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn me(
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<DataResponse<SessionContext>>> {
    Ok(Json(DataResponse { data: session }))
}
