//! Repository for the `instructors` table.

use mindnest_core::types::DbId;
use sqlx::PgPool;

use crate::models::instructor::{CreateInstructor, Instructor};

const COLUMNS: &str =
    "id, user_id, full_name, specialization, email, bio, created_at, updated_at";

/// Provides lookup and insert operations for instructors.
pub struct InstructorRepo;

impl InstructorRepo {
    /// Insert a new instructor profile, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateInstructor,
    ) -> Result<Instructor, sqlx::Error> {
        let query = format!(
            "INSERT INTO instructors (user_id, full_name, specialization, email, bio)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Instructor>(&query)
            .bind(input.user_id)
            .bind(&input.full_name)
            .bind(&input.specialization)
            .bind(&input.email)
            .bind(&input.bio)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Instructor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM instructors WHERE id = $1");
        sqlx::query_as::<_, Instructor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all instructors ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Instructor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM instructors ORDER BY full_name ASC, id ASC");
        sqlx::query_as::<_, Instructor>(&query)
            .fetch_all(pool)
            .await
    }
}
