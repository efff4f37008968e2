//! Repository for the `messages` table.

use mindnest_core::types::DbId;
use sqlx::PgPool;

use crate::models::message::{Message, SendMessage};

const COLUMNS: &str = "id, sender_id, receiver_id, content, sent_at, is_read, read_at";

/// Provides append and read-state operations for direct messages.
pub struct MessageRepo;

impl MessageRepo {
    /// Store a new message, returning the created row.
    pub async fn create(pool: &PgPool, input: &SendMessage) -> Result<Message, sqlx::Error> {
        let query = format!(
            "INSERT INTO messages (sender_id, receiver_id, content)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(input.sender_id)
            .bind(input.receiver_id)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// All messages exchanged between two users, oldest first.
    pub async fn conversation(
        pool: &PgPool,
        user_a: DbId,
        user_b: DbId,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages
             WHERE (sender_id = $1 AND receiver_id = $2)
                OR (sender_id = $2 AND receiver_id = $1)
             ORDER BY sent_at ASC, id ASC"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(user_a)
            .bind(user_b)
            .fetch_all(pool)
            .await
    }

    /// Messages received by a user, newest first.
    pub async fn inbox(pool: &PgPool, user_id: DbId) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages
             WHERE receiver_id = $1
             ORDER BY sent_at DESC, id DESC"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Mark a message read. Only the receiver may do so.
    ///
    /// Returns `true` if an unread message addressed to `receiver_id` was updated.
    pub async fn mark_read(
        pool: &PgPool,
        message_id: DbId,
        receiver_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = true, read_at = NOW()
             WHERE id = $1 AND receiver_id = $2 AND is_read = false",
        )
        .bind(message_id)
        .bind(receiver_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM messages WHERE receiver_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
