//! Therapy session entity model and DTOs.

use mindnest_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `therapy_sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TherapySession {
    pub id: DbId,
    pub session_request_id: Option<DbId>,
    pub instructor_id: DbId,
    pub client_id: DbId,
    pub scheduled_at: Timestamp,
    pub duration_minutes: i32,
    pub status: String,
    pub meeting_link: Option<String>,
    pub start_link: Option<String>,
    pub creation_method: String,
    pub notes: Option<String>,
    pub rating: Option<i16>,
    pub feedback: Option<String>,
    pub rated_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a therapy session.
#[derive(Debug, Clone)]
pub struct NewTherapySession {
    pub session_request_id: Option<DbId>,
    pub instructor_id: DbId,
    pub client_id: DbId,
    pub scheduled_at: Timestamp,
    pub duration_minutes: i32,
    pub meeting_link: Option<String>,
    pub start_link: Option<String>,
    pub creation_method: String,
}

/// Request body for `PUT /sessions/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateSessionStatus {
    pub status: String,
    pub notes: Option<String>,
}

/// Request body for `POST /sessions/{id}/rating`.
#[derive(Debug, Deserialize)]
pub struct RateSession {
    pub rating: i16,
    pub feedback: Option<String>,
}

/// Lightweight projection for dashboard "upcoming" lists.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UpcomingSession {
    pub id: DbId,
    pub client_id: DbId,
    pub client_name: String,
    pub scheduled_at: Timestamp,
    pub meeting_link: Option<String>,
}
