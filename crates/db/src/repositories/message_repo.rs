//! Repository for direct messages.

use letssee_core::messaging::MessageDraft;
use letssee_core::types::{DbId, UserId};
use sqlx::PgPool;

use super::MediaRepo;
use crate::models::message::{ConversationSummary, Message};

const COLUMNS: &str = "id, sender_id, recipient_id, body, media_type, tmdb_id, \
    media_title, media_poster_path, read_at, created_at";

pub struct MessageRepo;

impl MessageRepo {
    /// Store a validated message, caching the card's metadata.
    pub async fn create(
        pool: &PgPool,
        sender_id: UserId,
        recipient_id: UserId,
        draft: &MessageDraft,
    ) -> Result<Message, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if let Some(card) = &draft.card {
            if !card.snapshot.is_empty() {
                MediaRepo::upsert_snapshot(&mut *tx, card.key, &card.snapshot).await?;
            }
        }

        let card = draft.card.as_ref();
        let query = format!(
            "INSERT INTO messages \
                 (sender_id, recipient_id, body, media_type, tmdb_id, media_title, media_poster_path) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let message = sqlx::query_as::<_, Message>(&query)
            .bind(sender_id)
            .bind(recipient_id)
            .bind(draft.body.as_deref())
            .bind(card.map(|c| c.key.media_type.as_str()))
            .bind(card.map(|c| c.key.tmdb_id))
            .bind(card.and_then(|c| c.snapshot.title.as_deref()))
            .bind(card.and_then(|c| c.snapshot.poster_path.as_deref()))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(message)
    }

    /// Messages between two users, newest first, older than `before` when set.
    pub async fn thread(
        pool: &PgPool,
        user_id: UserId,
        other_id: UserId,
        before: Option<DbId>,
        limit: i64,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages \
             WHERE ((sender_id = $1 AND recipient_id = $2) \
                 OR (sender_id = $2 AND recipient_id = $1)) \
               AND ($3::BIGINT IS NULL OR id < $3) \
             ORDER BY id DESC \
             LIMIT $4"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(user_id)
            .bind(other_id)
            .bind(before)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Mark everything `other_id` sent to `user_id` as read.
    pub async fn mark_thread_read(
        pool: &PgPool,
        user_id: UserId,
        other_id: UserId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE messages SET read_at = NOW() \
             WHERE recipient_id = $1 AND sender_id = $2 AND read_at IS NULL",
        )
        .bind(user_id)
        .bind(other_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn unread_count(pool: &PgPool, user_id: UserId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM messages WHERE recipient_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// One row per counterpart with the latest message, newest first.
    pub async fn conversations(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Vec<ConversationSummary>, sqlx::Error> {
        sqlx::query_as::<_, ConversationSummary>(
            "WITH mine AS ( \
                 SELECT m.*, \
                        CASE WHEN m.sender_id = $1 THEN m.recipient_id ELSE m.sender_id END \
                            AS other_id \
                 FROM messages m \
                 WHERE m.sender_id = $1 OR m.recipient_id = $1 \
             ), latest AS ( \
                 SELECT DISTINCT ON (other_id) * FROM mine ORDER BY other_id, id DESC \
             ), unread AS ( \
                 SELECT sender_id AS other_id, COUNT(*) AS unread_count \
                 FROM messages \
                 WHERE recipient_id = $1 AND read_at IS NULL \
                 GROUP BY sender_id \
             ) \
             SELECT p.id AS user_id, p.username, p.display_name, p.avatar_url, \
                    l.id AS last_message_id, l.body AS last_message_body, \
                    (l.tmdb_id IS NOT NULL) AS last_message_has_media, \
                    l.sender_id AS last_message_sender_id, \
                    l.created_at AS last_message_at, \
                    COALESCE(u.unread_count, 0) AS unread_count \
             FROM latest l \
             JOIN profiles p ON p.id = l.other_id \
             LEFT JOIN unread u ON u.other_id = l.other_id \
             ORDER BY l.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
