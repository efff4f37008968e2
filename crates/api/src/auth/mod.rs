//! Credential primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`token`] -- opaque session tokens and their stored digests.

pub mod password;
pub mod token;
