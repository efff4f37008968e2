//! Mindnest domain logic.
//!
//! Pure, I/O-free building blocks shared by the database and API layers:
//! status machines, validation rules, dashboard time windows, and the
//! per-login session context.

pub mod dashboard;
pub mod error;
pub mod identity;
pub mod messaging;
pub mod notification;
pub mod session;
pub mod session_request;
pub mod therapy_session;
pub mod types;
