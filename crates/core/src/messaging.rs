//! Direct message validation.

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum length of a single message (characters).
pub const MAX_CONTENT_LENGTH: usize = 5_000;

/// Validate a message before it is stored.
pub fn validate_message(sender_id: DbId, receiver_id: DbId, content: &str) -> Result<(), CoreError> {
    if sender_id == receiver_id {
        return Err(CoreError::Validation(
            "Cannot send a message to yourself".into(),
        ));
    }
    if content.trim().is_empty() {
        return Err(CoreError::Validation("Message content must not be empty".into()));
    }
    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Message exceeds maximum length of {MAX_CONTENT_LENGTH} characters"
        )));
    }
    Ok(())
}
