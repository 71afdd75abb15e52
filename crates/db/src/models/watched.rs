//! Watched item rows and public review projections.

use letssee_core::media::MediaType;
use letssee_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `watched_items` table.
///
/// `diary_text` is private to the owner; handlers strip it before returning
/// another user's rows.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WatchedItem {
    pub id: DbId,
    pub user_id: UserId,
    #[sqlx(try_from = "String")]
    pub media_type: MediaType,
    pub tmdb_id: i64,
    pub rating: Option<f64>,
    pub diary_text: Option<String>,
    pub review_text: Option<String>,
    pub watched_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A public review joined with its author.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PublicReview {
    pub id: DbId,
    pub user_id: UserId,
    pub username: String,
    pub avatar_url: Option<String>,
    #[sqlx(try_from = "String")]
    pub media_type: MediaType,
    pub tmdb_id: i64,
    pub rating: Option<f64>,
    pub review_text: String,
    pub watched_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Aggregate rating/review numbers for one title.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct ReviewStats {
    pub watched_count: i64,
    pub rating_count: i64,
    pub average_rating: Option<f64>,
    pub review_count: i64,
}

/// Column updates for a watched item: `(write, value)` pairs.
#[derive(Debug, Clone, Default)]
pub struct WatchedDetails {
    pub rating: (bool, Option<f64>),
    pub diary_text: (bool, Option<String>),
    pub review_text: (bool, Option<String>),
    pub watched_at: Option<Timestamp>,
}
