//! Notification type names and paging limits.

/// Sent to the instructor's linked user when a client asks for a session.
pub const TYPE_REQUEST_CREATED: &str = "session_request.created";
/// Sent to the requester when the instructor accepts.
pub const TYPE_REQUEST_ACCEPTED: &str = "session_request.accepted";
/// Sent to the requester when the instructor declines.
pub const TYPE_REQUEST_DECLINED: &str = "session_request.declined";

/// Default page size for notification listing.
pub const DEFAULT_LIMIT: i64 = 50;
/// Maximum page size for notification listing.
pub const MAX_LIMIT: i64 = 100;

/// Clamp caller-supplied paging parameters.
pub fn page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paging_defaults_and_caps() {
        assert_eq!(page(None, None), (DEFAULT_LIMIT, 0));
        assert_eq!(page(Some(500), Some(10)), (MAX_LIMIT, 10));
        assert_eq!(page(Some(0), Some(-3)), (1, 0));
    }
}
