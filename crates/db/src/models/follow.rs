//! Follow request and connection rows.

use letssee_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `follow_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FollowRequest {
    pub id: DbId,
    pub requester_id: UserId,
    pub target_id: UserId,
    pub created_at: Timestamp,
}

/// A pending request joined with the profile on the other side.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FollowRequestView {
    pub id: DbId,
    pub user_id: UserId,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: Timestamp,
}

/// A row from the `connections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Connection {
    pub id: DbId,
    pub follower_id: UserId,
    pub followee_id: UserId,
    pub created_at: Timestamp,
}

/// Result of a follow action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowStatus {
    Following,
    Requested,
}
