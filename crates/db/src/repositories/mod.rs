//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-table writes open
//! their own transaction.

pub mod dashboard_repo;
pub mod instructor_repo;
pub mod message_repo;
pub mod notification_repo;
pub mod session_repo;
pub mod session_request_repo;
pub mod therapy_session_repo;
pub mod user_repo;

pub use dashboard_repo::DashboardRepo;
pub use instructor_repo::InstructorRepo;
pub use message_repo::MessageRepo;
pub use notification_repo::NotificationRepo;
pub use session_repo::SessionRepo;
pub use session_request_repo::SessionRequestRepo;
pub use therapy_session_repo::TherapySessionRepo;
pub use user_repo::UserRepo;
