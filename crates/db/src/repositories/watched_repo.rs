//! Repository for watched-item details and public reviews.

use letssee_core::media::MediaKey;
use letssee_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::watched::{PublicReview, ReviewStats, WatchedDetails, WatchedItem};

const COLUMNS: &str = "id, user_id, media_type, tmdb_id, rating, diary_text, review_text, \
    watched_at, created_at, updated_at";

pub struct WatchedRepo;

impl WatchedRepo {
    pub async fn find(
        pool: &PgPool,
        user_id: UserId,
        key: MediaKey,
    ) -> Result<Option<WatchedItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM watched_items \
             WHERE user_id = $1 AND media_type = $2 AND tmdb_id = $3"
        );
        sqlx::query_as::<_, WatchedItem>(&query)
            .bind(user_id)
            .bind(key.media_type.as_str())
            .bind(key.tmdb_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WatchedItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM watched_items WHERE id = $1");
        sqlx::query_as::<_, WatchedItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Write the requested columns of an existing watched row.
    ///
    /// Returns `None` when the user has not watched the title.
    pub async fn update_details(
        pool: &PgPool,
        user_id: UserId,
        key: MediaKey,
        details: &WatchedDetails,
    ) -> Result<Option<WatchedItem>, sqlx::Error> {
        let query = format!(
            "UPDATE watched_items SET \
                 rating = CASE WHEN $4 THEN $5 ELSE rating END, \
                 diary_text = CASE WHEN $6 THEN $7 ELSE diary_text END, \
                 review_text = CASE WHEN $8 THEN $9 ELSE review_text END, \
                 watched_at = COALESCE($10, watched_at) \
             WHERE user_id = $1 AND media_type = $2 AND tmdb_id = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WatchedItem>(&query)
            .bind(user_id)
            .bind(key.media_type.as_str())
            .bind(key.tmdb_id)
            .bind(details.rating.0)
            .bind(details.rating.1)
            .bind(details.diary_text.0)
            .bind(details.diary_text.1.as_deref())
            .bind(details.review_text.0)
            .bind(details.review_text.1.as_deref())
            .bind(details.watched_at)
            .fetch_optional(pool)
            .await
    }

    /// Non-empty reviews of a title by public profiles, newest first.
    pub async fn list_public_reviews(
        pool: &PgPool,
        key: MediaKey,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PublicReview>, sqlx::Error> {
        sqlx::query_as::<_, PublicReview>(
            "SELECT w.id, w.user_id, p.username, p.avatar_url, w.media_type, w.tmdb_id, \
                    w.rating, w.review_text, w.watched_at, w.updated_at \
             FROM watched_items w \
             JOIN profiles p ON p.id = w.user_id \
             WHERE w.media_type = $1 AND w.tmdb_id = $2 \
               AND w.review_text IS NOT NULL AND w.review_text <> '' \
               AND p.visibility = 'public' \
             ORDER BY w.updated_at DESC, w.id DESC \
             LIMIT $3 OFFSET $4",
        )
        .bind(key.media_type.as_str())
        .bind(key.tmdb_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Aggregate numbers over every user who watched the title.
    pub async fn review_stats(pool: &PgPool, key: MediaKey) -> Result<ReviewStats, sqlx::Error> {
        sqlx::query_as::<_, ReviewStats>(
            "SELECT COUNT(*) AS watched_count, \
                    COUNT(rating) AS rating_count, \
                    AVG(rating) AS average_rating, \
                    COUNT(*) FILTER (WHERE review_text IS NOT NULL AND review_text <> '') \
                        AS review_count \
             FROM watched_items \
             WHERE media_type = $1 AND tmdb_id = $2",
        )
        .bind(key.media_type.as_str())
        .bind(key.tmdb_id)
        .fetch_one(pool)
        .await
    }

    /// A user's most recent watched rows.
    pub async fn recent_for_user(
        pool: &PgPool,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<WatchedItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM watched_items WHERE user_id = $1 \
             ORDER BY watched_at DESC, id DESC LIMIT $2"
        );
        sqlx::query_as::<_, WatchedItem>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
