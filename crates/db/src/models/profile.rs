//! Profile, counter and profile-summary rows.

use letssee_core::profiles::Visibility;
use letssee_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: UserId,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    #[sqlx(try_from = "String")]
    pub visibility: Visibility,
    pub featured_list_id: Option<DbId>,
    pub featured_review_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Lightweight profile info for follower lists, conversations and reviews.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProfileSummary {
    pub id: UserId,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// A row from the `user_stats` table.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct UserStats {
    pub watched_count: i32,
    pub favorites_count: i32,
    pub watchlist_count: i32,
    pub watching_count: i32,
}

/// Social counts computed on read.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct SocialCounts {
    pub followers_count: i64,
    pub following_count: i64,
    pub lists_count: i64,
}

/// Validated input for creating or updating a profile.
///
/// For every field `None` keeps the stored value. For the nullable columns
/// `Some(None)` clears the value. A new profile without a `username` gets
/// the generated default.
#[derive(Debug, Clone, Default)]
pub struct UpsertProfile {
    pub username: Option<String>,
    pub display_name: Option<Option<String>>,
    pub avatar_url: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub visibility: Option<Visibility>,
    pub featured_list_id: Option<Option<DbId>>,
    pub featured_review_id: Option<Option<DbId>>,
}
