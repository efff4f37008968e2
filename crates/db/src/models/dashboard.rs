//! Dashboard aggregate rows.

use serde::Serialize;
use sqlx::FromRow;

/// Request and session counts for one instructor, computed in a single query.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct InstructorCounts {
    pub pending_requests: i64,
    pub distinct_clients: i64,
    pub todays_sessions: i64,
    pub weekly_sessions: i64,
}

/// Request and session counts for one client.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct ClientCounts {
    pub pending_requests: i64,
    pub upcoming_sessions: i64,
    pub completed_sessions: i64,
}
