//! Session request entity model and DTOs.

use mindnest_core::session_request::Requester;
use mindnest_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `session_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SessionRequest {
    pub id: DbId,
    pub instructor_id: DbId,
    pub client_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub requested_at: Timestamp,
    pub reason: Option<String>,
    pub status: String,
    pub meeting_link: Option<String>,
    pub responded_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SessionRequest {
    /// The requester encoded by the `client_id` / `user_id` pair.
    pub fn requester(&self) -> Option<Requester> {
        Requester::from_columns(self.client_id, self.user_id)
    }
}

/// Request body for creating a session request.
///
/// Every identifying field is optional here so that missing values produce a
/// descriptive validation error instead of a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub instructor_id: Option<DbId>,
    pub client_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub requested_at: Option<Timestamp>,
    pub reason: Option<String>,
}

/// Validated insert DTO.
#[derive(Debug, Clone)]
pub struct NewSessionRequest {
    pub instructor_id: DbId,
    pub requester: Requester,
    pub requested_at: Timestamp,
    pub reason: Option<String>,
}

/// Request body for `POST /session-requests/{id}/accept`.
#[derive(Debug, Default, Deserialize)]
pub struct AcceptSessionRequest {
    /// Link to use when the meeting provider cannot create one.
    pub manual_link: Option<String>,
    /// Meeting length; the server default applies when omitted.
    pub duration_minutes: Option<i32>,
}

/// Everything the accept transaction writes besides the status change.
#[derive(Debug, Clone)]
pub struct AcceptedSession {
    pub meeting_link: Option<String>,
    pub start_link: Option<String>,
    pub creation_method: String,
    pub duration_minutes: i32,
    pub notification_title: String,
    pub notification_message: String,
}
