//! Custom list rows.

use letssee_core::media::MediaType;
use letssee_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `user_lists` table with its item count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserList {
    pub id: DbId,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub item_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from `user_list_items` joined with its metadata snapshot.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserListItem {
    pub id: DbId,
    pub list_id: DbId,
    #[sqlx(try_from = "String")]
    pub media_type: MediaType,
    pub tmdb_id: i64,
    pub position: i32,
    pub note: Option<String>,
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub created_at: Timestamp,
}

/// A list with its items, as returned by the detail endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct UserListWithItems {
    #[serde(flatten)]
    pub list: UserList,
    pub items: Vec<UserListItem>,
}

/// Validated input for a new list.
#[derive(Debug, Clone)]
pub struct CreateList {
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
}

/// Validated patch for a list. `None` keeps the stored value;
/// `description: Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateList {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub is_public: Option<bool>,
}
