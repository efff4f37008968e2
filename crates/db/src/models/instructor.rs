//! Instructor entity model and DTOs.

use mindnest_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `instructors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Instructor {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub full_name: String,
    pub specialization: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an instructor profile.
#[derive(Debug, Deserialize)]
pub struct CreateInstructor {
    pub user_id: Option<DbId>,
    pub full_name: String,
    pub specialization: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
}
