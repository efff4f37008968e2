//! Repository for the `therapy_sessions` table.

use mindnest_core::therapy_session::{STATUS_COMPLETED, STATUS_SCHEDULED};
use mindnest_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::therapy_session::{NewTherapySession, TherapySession, UpcomingSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, session_request_id, instructor_id, client_id, scheduled_at, \
                        duration_minutes, status, meeting_link, start_link, creation_method, \
                        notes, rating, feedback, rated_at, created_at, updated_at";

/// Provides CRUD operations for therapy sessions.
pub struct TherapySessionRepo;

impl TherapySessionRepo {
    /// Insert a session on an open connection or transaction.
    pub async fn insert(
        conn: &mut PgConnection,
        input: &NewTherapySession,
    ) -> Result<TherapySession, sqlx::Error> {
        let query = format!(
            "INSERT INTO therapy_sessions
                (session_request_id, instructor_id, client_id, scheduled_at, duration_minutes,
                 status, meeting_link, start_link, creation_method)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TherapySession>(&query)
            .bind(input.session_request_id)
            .bind(input.instructor_id)
            .bind(input.client_id)
            .bind(input.scheduled_at)
            .bind(input.duration_minutes)
            .bind(STATUS_SCHEDULED)
            .bind(&input.meeting_link)
            .bind(&input.start_link)
            .bind(&input.creation_method)
            .fetch_one(&mut *conn)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TherapySession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM therapy_sessions WHERE id = $1");
        sqlx::query_as::<_, TherapySession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All sessions of an instructor, most recently scheduled first.
    pub async fn list_for_instructor(
        pool: &PgPool,
        instructor_id: DbId,
    ) -> Result<Vec<TherapySession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM therapy_sessions
             WHERE instructor_id = $1
             ORDER BY scheduled_at DESC, id DESC"
        );
        sqlx::query_as::<_, TherapySession>(&query)
            .bind(instructor_id)
            .fetch_all(pool)
            .await
    }

    /// All sessions of a client, most recently scheduled first.
    pub async fn list_for_client(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Vec<TherapySession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM therapy_sessions
             WHERE client_id = $1
             ORDER BY scheduled_at DESC, id DESC"
        );
        sqlx::query_as::<_, TherapySession>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// Move a session from `current` to `next` status.
    ///
    /// The update only applies while the row still has `current` status, so a
    /// concurrent change makes this return `None`.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        current: &str,
        next: &str,
        notes: Option<&str>,
    ) -> Result<Option<TherapySession>, sqlx::Error> {
        let query = format!(
            "UPDATE therapy_sessions SET
                status = $3,
                notes = COALESCE($4, notes)
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TherapySession>(&query)
            .bind(id)
            .bind(current)
            .bind(next)
            .bind(notes)
            .fetch_optional(pool)
            .await
    }

    /// Record the one-time rating of a completed session.
    ///
    /// Returns `None` when the session is not completed or already rated.
    pub async fn set_rating(
        pool: &PgPool,
        id: DbId,
        rating: i16,
        feedback: Option<&str>,
    ) -> Result<Option<TherapySession>, sqlx::Error> {
        let query = format!(
            "UPDATE therapy_sessions SET
                rating = $2,
                feedback = $3,
                rated_at = NOW()
             WHERE id = $1 AND status = $4 AND rating IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TherapySession>(&query)
            .bind(id)
            .bind(rating)
            .bind(feedback)
            .bind(STATUS_COMPLETED)
            .fetch_optional(pool)
            .await
    }

    /// Every rating an instructor has received.
    pub async fn ratings_for_instructor(
        pool: &PgPool,
        instructor_id: DbId,
    ) -> Result<Vec<i16>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT rating FROM therapy_sessions
             WHERE instructor_id = $1 AND rating IS NOT NULL",
        )
        .bind(instructor_id)
        .fetch_all(pool)
        .await
    }

    /// Next scheduled sessions of an instructor starting at or after `from`.
    pub async fn upcoming_for_instructor(
        pool: &PgPool,
        instructor_id: DbId,
        from: Timestamp,
        limit: i64,
    ) -> Result<Vec<UpcomingSession>, sqlx::Error> {
        sqlx::query_as::<_, UpcomingSession>(
            "SELECT ts.id, ts.client_id, u.full_name AS client_name,
                    ts.scheduled_at, ts.meeting_link
             FROM therapy_sessions ts
             JOIN users u ON u.id = ts.client_id
             WHERE ts.instructor_id = $1
               AND ts.status = $2
               AND ts.scheduled_at >= $3
             ORDER BY ts.scheduled_at ASC, ts.id ASC
             LIMIT $4",
        )
        .bind(instructor_id)
        .bind(STATUS_SCHEDULED)
        .bind(from)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
