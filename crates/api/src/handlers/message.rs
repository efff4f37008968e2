//! Handlers for direct messages between users.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mindnest_core::messaging::validate_message;
use mindnest_core::types::DbId;
use mindnest_db::models::message::{Message, SendMessage};
use mindnest_db::repositories::MessageRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::notification::UnreadCount;
use crate::handlers::user::ensure_user_exists;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /messages/conversation`.
#[derive(Debug, Deserialize)]
pub struct ConversationQuery {
    pub user_a: DbId,
    pub user_b: DbId,
}

/// Query parameters for `POST /messages/{id}/read`.
#[derive(Debug, Deserialize)]
pub struct ReceiverQuery {
    /// Only the receiver may mark a message read.
    pub user_id: DbId,
}

/// POST /api/v1/messages
pub async fn send_message(
    State(state): State<AppState>,
    Json(input): Json<SendMessage>,
) -> AppResult<impl IntoResponse> {
    validate_message(input.sender_id, input.receiver_id, &input.content)?;
    ensure_user_exists(&state.pool, input.sender_id).await?;
    ensure_user_exists(&state.pool, input.receiver_id).await?;

    let message = MessageRepo::create(&state.pool, &input).await?;

    tracing::info!(
        message_id = message.id,
        sender_id = message.sender_id,
        receiver_id = message.receiver_id,
        "Message sent"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: message })))
}

/// GET /api/v1/messages/conversation?user_a=&user_b=
///
/// Both directions, oldest first.
pub async fn conversation(
    State(state): State<AppState>,
    Query(params): Query<ConversationQuery>,
) -> AppResult<Json<DataResponse<Vec<Message>>>> {
    let messages = MessageRepo::conversation(&state.pool, params.user_a, params.user_b).await?;
    Ok(Json(DataResponse { data: messages }))
}

/// GET /api/v1/users/{id}/messages
///
/// Messages received by the user, newest first.
pub async fn inbox(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Message>>>> {
    ensure_user_exists(&state.pool, user_id).await?;
    let messages = MessageRepo::inbox(&state.pool, user_id).await?;
    Ok(Json(DataResponse { data: messages }))
}

/// GET /api/v1/users/{id}/messages/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<UnreadCount>>> {
    let count = MessageRepo::unread_count(&state.pool, user_id).await?;
    Ok(Json(DataResponse {
        data: UnreadCount { count },
    }))
}

/// POST /api/v1/messages/{id}/read?user_id=
///
/// Returns 204 on success, 404 if no unread message with that id was sent to
/// `user_id`.
pub async fn mark_read(
    State(state): State<AppState>,
    Path(message_id): Path<DbId>,
    Query(params): Query<ReceiverQuery>,
) -> AppResult<StatusCode> {
    if !MessageRepo::mark_read(&state.pool, message_id, params.user_id).await? {
        return Err(AppError::not_found("Message", message_id));
    }
    Ok(StatusCode::NO_CONTENT)
}
