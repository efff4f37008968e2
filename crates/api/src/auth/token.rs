//! Opaque login-session tokens.
//!
//! The plaintext token is handed to the client once; only its SHA-256 hex
//! digest is stored, so a database leak does not expose live sessions.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Generate a new token, returning `(plaintext, hash)`.
pub fn generate_session_token() -> (String, String) {
    let plaintext = Uuid::new_v4().to_string();
    let hash = hash_session_token(&plaintext);
    (plaintext, hash)
}

/// SHA-256 hex digest of a session token.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
