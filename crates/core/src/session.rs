//! Per-login session context.
//!
//! A [`SessionContext`] is built when a user logs in and resolved again from
//! the bearer token on each request that needs it. Nothing about the current
//! user lives in process-wide state; logging out revokes the stored session
//! so the context can no longer be resolved.

use chrono::Duration;
use serde::Serialize;

use crate::error::CoreError;
use crate::identity::Role;
use crate::types::{DbId, Timestamp};

/// Identity of the user behind an active login session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionContext {
    pub session_id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub role: Role,
    pub expires_at: Timestamp,
}

/// Bounds for the configured login session lifetime, in hours (one year max).
pub const MIN_SESSION_TTL_HOURS: i64 = 1;
pub const MAX_SESSION_TTL_HOURS: i64 = 8_760;

/// Check a configured session lifetime.
pub fn validate_session_ttl(ttl_hours: i64) -> Result<(), CoreError> {
    if (MIN_SESSION_TTL_HOURS..=MAX_SESSION_TTL_HOURS).contains(&ttl_hours) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Session TTL must be between {MIN_SESSION_TTL_HOURS} and \
             {MAX_SESSION_TTL_HOURS} hours (got {ttl_hours})"
        )))
    }
}

/// Expiry instant for a session created at `now` with a lifetime of `ttl_hours`.
pub fn session_expiry(now: Timestamp, ttl_hours: i64) -> Result<Timestamp, CoreError> {
    validate_session_ttl(ttl_hours)?;
    Duration::try_hours(ttl_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| CoreError::Internal(format!("Session expiry overflowed ({ttl_hours} h)")))
}
