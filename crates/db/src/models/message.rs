//! Direct message rows.

use letssee_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub sender_id: UserId,
    pub recipient_id: UserId,
    pub body: Option<String>,
    /// `movie` or `tv` when the message carries a media card.
    pub media_type: Option<String>,
    pub tmdb_id: Option<i64>,
    pub media_title: Option<String>,
    pub media_poster_path: Option<String>,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// One conversation: the counterpart, the latest message and unread count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConversationSummary {
    pub user_id: UserId,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub last_message_id: DbId,
    pub last_message_body: Option<String>,
    pub last_message_has_media: bool,
    pub last_message_sender_id: UserId,
    pub last_message_at: Timestamp,
    pub unread_count: i64,
}
