//! Login-session extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use mindnest_core::error::CoreError;
use mindnest_core::identity::Role;
use mindnest_core::session::SessionContext;
use mindnest_db::repositories::{SessionRepo, UserRepo};

use crate::auth::token::hash_session_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// The session behind the `Authorization: Bearer <token>` header.
///
/// ```ignore
/// async fn me(CurrentSession(session): CurrentSession) -> Json<SessionContext> {
///     Json(session)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentSession(pub SessionContext);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let context = resolve_session(state, token).await?;
        Ok(CurrentSession(context))
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

fn bearer_token(parts: &Parts) -> AppResult<&str> {
    let header = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))
}

/// Look up an active session by token and build its [`SessionContext`].
async fn resolve_session(state: &AppState, token: &str) -> AppResult<SessionContext> {
    let session = SessionRepo::find_active_by_token_hash(&state.pool, &hash_session_token(token))
        .await?
        .ok_or_else(|| unauthorized("Invalid or expired session"))?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| unauthorized("Invalid or expired session"))?;

    let role = Role::parse(&user.role).map_err(|_| {
        AppError::InternalError(format!("User {} has unknown role '{}'", user.id, user.role))
    })?;

    Ok(SessionContext {
        session_id: session.id,
        user_id: user.id,
        username: user.username,
        role,
        expires_at: session.expires_at,
    })
}
