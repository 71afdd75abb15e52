use letssee_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `watched_episodes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WatchedEpisode {
    pub id: DbId,
    pub user_id: UserId,
    pub show_id: i64,
    pub season_number: i32,
    pub episode_number: i32,
    pub watched_at: Timestamp,
}
