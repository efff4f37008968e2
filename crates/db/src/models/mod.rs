//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` request DTOs and the validated insert DTOs built from them

pub mod dashboard;
pub mod instructor;
pub mod message;
pub mod notification;
pub mod session;
pub mod session_request;
pub mod therapy_session;
pub mod user;
