//! Session request lifecycle rules.
//!
//! A session request moves from `PENDING` to exactly one of the terminal
//! states `ACCEPTED` or `DECLINED`. This module holds the status machine,
//! the requester-identity invariant, and the meeting-link fallback used when
//! a request is accepted.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_PENDING: &str = "PENDING";
pub const STATUS_ACCEPTED: &str = "ACCEPTED";
pub const STATUS_DECLINED: &str = "DECLINED";

/// All valid session request statuses.
pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_ACCEPTED, STATUS_DECLINED];

/// Maximum length of the free-text reason (characters).
pub const MAX_REASON_LENGTH: usize = 2_000;

/// Lifecycle status of a session request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Declined,
}

impl RequestStatus {
    /// The string stored in the `session_requests.status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => STATUS_PENDING,
            RequestStatus::Accepted => STATUS_ACCEPTED,
            RequestStatus::Declined => STATUS_DECLINED,
        }
    }

    /// Parse a status string, accepting any letter case.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.to_ascii_uppercase().as_str() {
            STATUS_PENDING => Ok(RequestStatus::Pending),
            STATUS_ACCEPTED => Ok(RequestStatus::Accepted),
            STATUS_DECLINED => Ok(RequestStatus::Declined),
            _ => Err(CoreError::Validation(format!(
                "Invalid session request status '{value}'. Must be one of: {VALID_STATUSES:?}"
            ))),
        }
    }

    /// `ACCEPTED` and `DECLINED` never change again.
    pub fn is_terminal(self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

/// Ensure a request in `current` status may still be accepted or declined.
///
/// Any terminal status yields [`CoreError::Conflict`]; acting twice on the
/// same request is rejected rather than silently ignored.
pub fn ensure_pending(request_id: DbId, current: &str) -> Result<(), CoreError> {
    let status = RequestStatus::parse(current)?;
    if status.is_terminal() {
        return Err(CoreError::Conflict(format!(
            "Session request {request_id} is already {}",
            status.as_str()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Requester identity
// ---------------------------------------------------------------------------

/// Who asked for the session. Exactly one of the two identifiers is set on
/// every stored request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requester {
    Client(DbId),
    User(DbId),
}

impl Requester {
    /// Resolve the requester from the two nullable columns of a stored row.
    pub fn from_columns(client_id: Option<DbId>, user_id: Option<DbId>) -> Option<Self> {
        match (client_id, user_id) {
            (Some(id), None) => Some(Requester::Client(id)),
            (None, Some(id)) => Some(Requester::User(id)),
            _ => None,
        }
    }

    /// The underlying user id, regardless of which column carried it.
    pub fn id(self) -> DbId {
        match self {
            Requester::Client(id) | Requester::User(id) => id,
        }
    }

    pub fn client_id(self) -> Option<DbId> {
        match self {
            Requester::Client(id) => Some(id),
            Requester::User(_) => None,
        }
    }

    pub fn user_id(self) -> Option<DbId> {
        match self {
            Requester::User(id) => Some(id),
            Requester::Client(_) => None,
        }
    }
}

/// Validate the identifying fields of a new request.
///
/// Returns the instructor id and the requester on success.
pub fn validate_new_request(
    instructor_id: Option<DbId>,
    client_id: Option<DbId>,
    user_id: Option<DbId>,
) -> Result<(DbId, Requester), CoreError> {
    let instructor_id = instructor_id
        .ok_or_else(|| CoreError::Validation("instructor_id is required".into()))?;

    let requester = match (client_id, user_id) {
        (Some(id), None) => Requester::Client(id),
        (None, Some(id)) => Requester::User(id),
        (None, None) => {
            return Err(CoreError::Validation(
                "Either client_id or user_id is required".into(),
            ))
        }
        (Some(_), Some(_)) => {
            return Err(CoreError::Validation(
                "Only one of client_id or user_id may be given".into(),
            ))
        }
    };

    Ok((instructor_id, requester))
}

/// Validate the optional free-text reason.
pub fn validate_reason(reason: Option<&str>) -> Result<(), CoreError> {
    if let Some(reason) = reason {
        if reason.chars().count() > MAX_REASON_LENGTH {
            return Err(CoreError::Validation(format!(
                "Reason exceeds maximum length of {MAX_REASON_LENGTH} characters"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Meeting link fallback
// ---------------------------------------------------------------------------

/// How the meeting link of an accepted request was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingMethod {
    /// Created through the external meeting provider.
    Api,
    /// Supplied by the instructor when accepting.
    Manual,
    /// No link available.
    None,
}

impl MeetingMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            MeetingMethod::Api => "api",
            MeetingMethod::Manual => "manual",
            MeetingMethod::None => "none",
        }
    }
}

/// Outcome of choosing a meeting link for an accepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub join_url: Option<String>,
    pub start_url: Option<String>,
    pub method: MeetingMethod,
}

/// Pick the meeting link: the provider's meeting if one was created,
/// otherwise the manual link, otherwise nothing.
///
/// `provided` is `(join_url, start_url)` from a successful provider call.
pub fn resolve_link(provided: Option<(String, Option<String>)>, manual: Option<&str>) -> ResolvedLink {
    if let Some((join_url, start_url)) = provided {
        return ResolvedLink {
            join_url: Some(join_url),
            start_url,
            method: MeetingMethod::Api,
        };
    }

    match normalize_manual_link(manual) {
        Some(link) => ResolvedLink {
            join_url: Some(link),
            start_url: None,
            method: MeetingMethod::Manual,
        },
        None => ResolvedLink {
            join_url: None,
            start_url: None,
            method: MeetingMethod::None,
        },
    }
}

/// Trim a caller-supplied link; blank strings count as absent.
pub fn normalize_manual_link(manual: Option<&str>) -> Option<String> {
    manual
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Reject manual links that are not http(s) URLs.
pub fn validate_manual_link(manual: Option<&str>) -> Result<(), CoreError> {
    match normalize_manual_link(manual) {
        Some(link) if !(link.starts_with("https://") || link.starts_with("http://")) => Err(
            CoreError::Validation(format!("Manual meeting link must be an http(s) URL: {link}")),
        ),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_accepts_any_case() {
        assert_eq!(RequestStatus::parse("pending").unwrap(), RequestStatus::Pending);
        assert_eq!(RequestStatus::parse("ACCEPTED").unwrap(), RequestStatus::Accepted);
        assert_eq!(RequestStatus::parse("Declined").unwrap(), RequestStatus::Declined);
        assert_matches!(RequestStatus::parse("cancelled"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn only_pending_is_non_terminal() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Accepted.is_terminal());
        assert!(RequestStatus::Declined.is_terminal());
    }

    #[test]
    fn ensure_pending_rejects_terminal_states() {
        assert!(ensure_pending(1, STATUS_PENDING).is_ok());
        assert_matches!(ensure_pending(1, STATUS_ACCEPTED), Err(CoreError::Conflict(_)));
        assert_matches!(ensure_pending(1, STATUS_DECLINED), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn new_request_requires_instructor() {
        assert_matches!(
            validate_new_request(None, Some(9), None),
            Err(CoreError::Validation(msg)) if msg.contains("instructor_id")
        );
    }

    #[test]
    fn new_request_requires_exactly_one_requester() {
        assert_matches!(
            validate_new_request(Some(5), None, None),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_new_request(Some(5), Some(9), Some(10)),
            Err(CoreError::Validation(_))
        );

        let (instructor, requester) = validate_new_request(Some(5), Some(9), None).unwrap();
        assert_eq!(instructor, 5);
        assert_eq!(requester, Requester::Client(9));
        assert_eq!(requester.id(), 9);
        assert_eq!(requester.client_id(), Some(9));
        assert_eq!(requester.user_id(), None);

        let (_, requester) = validate_new_request(Some(5), None, Some(12)).unwrap();
        assert_eq!(requester, Requester::User(12));
    }

    #[test]
    fn reason_length_is_bounded() {
        assert!(validate_reason(None).is_ok());
        assert!(validate_reason(Some("feeling anxious")).is_ok());
        let long = "x".repeat(MAX_REASON_LENGTH + 1);
        assert_matches!(validate_reason(Some(&long)), Err(CoreError::Validation(_)));
    }

    #[test]
    fn provider_link_wins_over_manual() {
        let resolved = resolve_link(
            Some(("https://zoom.us/j/1".into(), Some("https://zoom.us/s/1".into()))),
            Some("https://meet/x"),
        );
        assert_eq!(resolved.method, MeetingMethod::Api);
        assert_eq!(resolved.join_url.as_deref(), Some("https://zoom.us/j/1"));
        assert_eq!(resolved.start_url.as_deref(), Some("https://zoom.us/s/1"));
    }

    #[test]
    fn manual_link_used_when_provider_unavailable() {
        let resolved = resolve_link(None, Some("  https://meet/x "));
        assert_eq!(resolved.method, MeetingMethod::Manual);
        assert_eq!(resolved.join_url.as_deref(), Some("https://meet/x"));
        assert_eq!(resolved.start_url, None);
    }

    #[test]
    fn no_link_when_nothing_available() {
        let resolved = resolve_link(None, Some("   "));
        assert_eq!(resolved.method, MeetingMethod::None);
        assert_eq!(resolved.join_url, None);

        assert_eq!(resolve_link(None, None).method, MeetingMethod::None);
    }

    #[test]
    fn manual_link_must_be_http() {
        assert!(validate_manual_link(None).is_ok());
        assert!(validate_manual_link(Some("")).is_ok());
        assert!(validate_manual_link(Some("https://meet/x")).is_ok());
        assert_matches!(
            validate_manual_link(Some("ftp://meet/x")),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn meeting_method_serializes_lowercase() {
        assert_eq!(serde_json::to_value(MeetingMethod::Manual).unwrap(), "manual");
        assert_eq!(MeetingMethod::Api.as_str(), "api");
    }
}
