pub mod auth;
pub mod dashboard;
pub mod instructor;
pub mod message;
pub mod notification;
pub mod session_request;
pub mod therapy_session;
pub mod user;
