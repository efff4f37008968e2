//! Repository for the `session_requests` table.
//!
//! Accept and decline are the only writes after creation. Each runs in one
//! transaction together with the rows it implies (therapy session,
//! notification), and each only applies to a request that is still
//! `PENDING` at the moment of the update.

use mindnest_core::notification::{TYPE_REQUEST_ACCEPTED, TYPE_REQUEST_DECLINED};
use mindnest_core::session_request::{STATUS_ACCEPTED, STATUS_DECLINED, STATUS_PENDING};
use mindnest_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::NewNotification;
use crate::models::session_request::{AcceptedSession, NewSessionRequest, SessionRequest};
use crate::models::therapy_session::{NewTherapySession, TherapySession};
use crate::repositories::{NotificationRepo, TherapySessionRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, instructor_id, client_id, user_id, requested_at, reason, status, \
                        meeting_link, responded_at, created_at, updated_at";

/// Provides lifecycle and query operations for session requests.
pub struct SessionRequestRepo;

impl SessionRequestRepo {
    /// Insert a new `PENDING` request, returning the created row.
    ///
    /// When `notify` is given, the notification is written in the same
    /// transaction with `related_id` pointing at the new request.
    pub async fn create(
        pool: &PgPool,
        input: &NewSessionRequest,
        notify: Option<&NewNotification>,
    ) -> Result<SessionRequest, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO session_requests
                (instructor_id, client_id, user_id, requested_at, reason, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let request = sqlx::query_as::<_, SessionRequest>(&query)
            .bind(input.instructor_id)
            .bind(input.requester.client_id())
            .bind(input.requester.user_id())
            .bind(input.requested_at)
            .bind(&input.reason)
            .bind(STATUS_PENDING)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(draft) = notify {
            let notification = NewNotification {
                related_id: Some(request.id),
                ..draft.clone()
            };
            NotificationRepo::insert(&mut *tx, &notification).await?;
        }

        tx.commit().await?;
        Ok(request)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SessionRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM session_requests WHERE id = $1");
        sqlx::query_as::<_, SessionRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every request, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<SessionRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM session_requests ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, SessionRequest>(&query)
            .fetch_all(pool)
            .await
    }

    /// Requests addressed to an instructor, optionally filtered by status.
    pub async fn list_for_instructor(
        pool: &PgPool,
        instructor_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<SessionRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM session_requests
             WHERE instructor_id = $1
               AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, SessionRequest>(&query)
            .bind(instructor_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Requests made by a requester (matched on either `client_id` or
    /// `user_id`), optionally filtered by status.
    pub async fn list_for_requester(
        pool: &PgPool,
        requester_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<SessionRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM session_requests
             WHERE (client_id = $1 OR user_id = $1)
               AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, SessionRequest>(&query)
            .bind(requester_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Accept a pending request.
    ///
    /// In a single transaction: flips the status to `ACCEPTED`, creates the
    /// therapy session for the requester, and notifies the requester.
    /// Returns `None` (with nothing written) if the request is missing or no
    /// longer `PENDING`.
    pub async fn accept(
        pool: &PgPool,
        id: DbId,
        accepted: &AcceptedSession,
    ) -> Result<Option<(SessionRequest, TherapySession)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE session_requests SET
                status = $2,
                meeting_link = $3,
                responded_at = NOW()
             WHERE id = $1 AND status = $4
             RETURNING {COLUMNS}"
        );
        let Some(request) = sqlx::query_as::<_, SessionRequest>(&query)
            .bind(id)
            .bind(STATUS_ACCEPTED)
            .bind(&accepted.meeting_link)
            .bind(STATUS_PENDING)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let requester_id = requester_of(&request)?;

        let session = TherapySessionRepo::insert(
            &mut *tx,
            &NewTherapySession {
                session_request_id: Some(request.id),
                instructor_id: request.instructor_id,
                client_id: requester_id,
                scheduled_at: request.requested_at,
                duration_minutes: accepted.duration_minutes,
                meeting_link: accepted.meeting_link.clone(),
                start_link: accepted.start_link.clone(),
                creation_method: accepted.creation_method.clone(),
            },
        )
        .await?;

        NotificationRepo::insert(
            &mut *tx,
            &NewNotification {
                user_id: requester_id,
                notification_type: TYPE_REQUEST_ACCEPTED.to_string(),
                title: accepted.notification_title.clone(),
                message: accepted.notification_message.clone(),
                related_id: Some(session.id),
            },
        )
        .await?;

        tx.commit().await?;

        tracing::debug!(
            request_id = request.id,
            session_id = session.id,
            "Session request accepted in transaction"
        );
        Ok(Some((request, session)))
    }

    /// Decline a pending request and notify the requester.
    ///
    /// Returns `None` (with nothing written) if the request is missing or no
    /// longer `PENDING`. No therapy session is ever created here.
    pub async fn decline(
        pool: &PgPool,
        id: DbId,
        title: &str,
        message: &str,
    ) -> Result<Option<SessionRequest>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE session_requests SET
                status = $2,
                responded_at = NOW()
             WHERE id = $1 AND status = $3
             RETURNING {COLUMNS}"
        );
        let Some(request) = sqlx::query_as::<_, SessionRequest>(&query)
            .bind(id)
            .bind(STATUS_DECLINED)
            .bind(STATUS_PENDING)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        NotificationRepo::insert(
            &mut *tx,
            &NewNotification {
                user_id: requester_of(&request)?,
                notification_type: TYPE_REQUEST_DECLINED.to_string(),
                title: title.to_string(),
                message: message.to_string(),
                related_id: Some(request.id),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(Some(request))
    }
}

/// The requester's user id. The table's CHECK constraint guarantees exactly
/// one of the two columns is set.
fn requester_of(request: &SessionRequest) -> Result<DbId, sqlx::Error> {
    request.requester().map(|r| r.id()).ok_or_else(|| {
        sqlx::Error::Decode(
            format!("session request {} has no single requester", request.id).into(),
        )
    })
}
