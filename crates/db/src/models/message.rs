//! Direct message model and DTOs.

use mindnest_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub sender_id: DbId,
    pub receiver_id: DbId,
    pub content: String,
    pub sent_at: Timestamp,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
}

/// DTO for sending a message.
#[derive(Debug, Deserialize)]
pub struct SendMessage {
    pub sender_id: DbId,
    pub receiver_id: DbId,
    pub content: String,
}
