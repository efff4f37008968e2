//! Therapy session status constants, transitions, and rating rules.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Initial status of a session created from an accepted request.
pub const STATUS_SCHEDULED: &str = "SCHEDULED";
/// The session took place.
pub const STATUS_COMPLETED: &str = "COMPLETED";
/// The session was called off by the instructor.
pub const STATUS_CANCELLED: &str = "CANCELLED";

/// All valid therapy session statuses.
pub const VALID_STATUSES: &[&str] = &[STATUS_SCHEDULED, STATUS_COMPLETED, STATUS_CANCELLED];

/// Inclusive rating bounds.
pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

/// Default meeting length when the caller does not give one.
pub const DEFAULT_DURATION_MINUTES: i32 = 60;

/// Upper bound for a single session (minutes).
pub const MAX_DURATION_MINUTES: i32 = 480;

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// Returns the set of statuses that `from_status` may transition to.
///
/// - `SCHEDULED` -> `COMPLETED`, `CANCELLED`
/// - `COMPLETED` and `CANCELLED` are final.
pub fn valid_transitions(from_status: &str) -> &'static [&'static str] {
    match from_status {
        STATUS_SCHEDULED => &[STATUS_COMPLETED, STATUS_CANCELLED],
        _ => &[],
    }
}

/// Validate that a status string is one of the known statuses.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid therapy session status '{status}'. Must be one of: {VALID_STATUSES:?}"
        )))
    }
}

/// Validate that a status transition from `current` to `next` is allowed.
pub fn validate_transition(current: &str, next: &str) -> Result<(), CoreError> {
    validate_status(next)?;
    let allowed = valid_transitions(current);
    if allowed.contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot transition therapy session from '{current}' to '{next}'. \
             Allowed transitions: {allowed:?}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Rating
// ---------------------------------------------------------------------------

/// A rating is accepted once, only for a completed session, within bounds.
pub fn validate_rating(
    status: &str,
    existing_rating: Option<i16>,
    rating: i16,
) -> Result<(), CoreError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING} (got {rating})"
        )));
    }
    if status != STATUS_COMPLETED {
        return Err(CoreError::Validation(format!(
            "Only completed sessions can be rated (status is '{status}')"
        )));
    }
    if existing_rating.is_some() {
        return Err(CoreError::Conflict("Session has already been rated".into()));
    }
    Ok(())
}

/// Resolve the requested meeting duration, falling back to `default`.
pub fn resolve_duration(requested: Option<i32>, default: i32) -> Result<i32, CoreError> {
    let minutes = requested.unwrap_or(default);
    if minutes <= 0 || minutes > MAX_DURATION_MINUTES {
        return Err(CoreError::Validation(format!(
            "Duration must be between 1 and {MAX_DURATION_MINUTES} minutes (got {minutes})"
        )));
    }
    Ok(minutes)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
