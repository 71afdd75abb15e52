//! Title metadata snapshots and library rows.

use letssee_core::media::MediaType;
use letssee_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// One title in a user's watched/favorite/watchlist/watching collection,
/// joined with its metadata snapshot.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LibraryEntry {
    pub id: DbId,
    #[sqlx(try_from = "String")]
    pub media_type: MediaType,
    pub tmdb_id: i64,
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    /// Only populated for the watched collection.
    pub rating: Option<f64>,
    pub review_text: Option<String>,
    /// Private to the owner; cleared by [`LibraryEntry::without_diary`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diary_text: Option<String>,
    pub added_at: Timestamp,
}

impl LibraryEntry {
    /// Drop the private diary before showing the row to another user.
    pub fn without_diary(mut self) -> Self {
        self.diary_text = None;
        self
    }
}
