//! Read-only aggregates for the instructor and client dashboards.
//!
//! Nothing here is cached or maintained incrementally: every call counts the
//! current rows.

use mindnest_core::dashboard::TimeWindow;
use mindnest_core::session_request::STATUS_PENDING;
use mindnest_core::therapy_session::{STATUS_CANCELLED, STATUS_COMPLETED, STATUS_SCHEDULED};
use mindnest_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::dashboard::{ClientCounts, InstructorCounts};

/// Provides dashboard count queries.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Counts for one instructor.
    ///
    /// `todays_sessions` and `weekly_sessions` count sessions whose
    /// `scheduled_at` falls inside `day` / `week`, excluding cancelled ones.
    pub async fn instructor_counts(
        pool: &PgPool,
        instructor_id: DbId,
        day: TimeWindow,
        week: TimeWindow,
    ) -> Result<InstructorCounts, sqlx::Error> {
        sqlx::query_as::<_, InstructorCounts>(
            "SELECT
                (SELECT COUNT(*) FROM session_requests
                  WHERE instructor_id = $1 AND status = $2) AS pending_requests,
                (SELECT COUNT(DISTINCT client_id) FROM therapy_sessions
                  WHERE instructor_id = $1) AS distinct_clients,
                (SELECT COUNT(*) FROM therapy_sessions
                  WHERE instructor_id = $1 AND status <> $7
                    AND scheduled_at >= $3 AND scheduled_at < $4) AS todays_sessions,
                (SELECT COUNT(*) FROM therapy_sessions
                  WHERE instructor_id = $1 AND status <> $7
                    AND scheduled_at >= $5 AND scheduled_at < $6) AS weekly_sessions",
        )
        .bind(instructor_id)
        .bind(STATUS_PENDING)
        .bind(day.start)
        .bind(day.end)
        .bind(week.start)
        .bind(week.end)
        .bind(STATUS_CANCELLED)
        .fetch_one(pool)
        .await
    }

    /// Counts for one client. Upcoming sessions are those still scheduled at
    /// or after `now`.
    pub async fn client_counts(
        pool: &PgPool,
        client_id: DbId,
        now: Timestamp,
    ) -> Result<ClientCounts, sqlx::Error> {
        sqlx::query_as::<_, ClientCounts>(
            "SELECT
                (SELECT COUNT(*) FROM session_requests
                  WHERE (client_id = $1 OR user_id = $1) AND status = $2) AS pending_requests,
                (SELECT COUNT(*) FROM therapy_sessions
                  WHERE client_id = $1 AND status = $3 AND scheduled_at >= $5)
                  AS upcoming_sessions,
                (SELECT COUNT(*) FROM therapy_sessions
                  WHERE client_id = $1 AND status = $4) AS completed_sessions",
        )
        .bind(client_id)
        .bind(STATUS_PENDING)
        .bind(STATUS_SCHEDULED)
        .bind(STATUS_COMPLETED)
        .bind(now)
        .fetch_one(pool)
        .await
    }
}
