//! Request extractors.
//!
//! - [`session::CurrentSession`] -- resolves the caller's login session from a
//!   Bearer token.

pub mod session;
