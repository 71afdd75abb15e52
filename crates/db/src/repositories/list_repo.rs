//! Repository for custom lists and their items.

use letssee_core::media::{MediaKey, MediaSnapshot};
use letssee_core::types::{DbId, UserId};
use sqlx::PgPool;

use super::{patch_bind, MediaRepo};
use crate::models::list::{CreateList, UpdateList, UserList, UserListItem};

const COLUMNS: &str = "\
    l.id, l.user_id, l.name, l.description, l.is_public, \
    (SELECT COUNT(*) FROM user_list_items i WHERE i.list_id = l.id) AS item_count, \
    l.created_at, l.updated_at";

const ITEM_COLUMNS: &str = "\
    i.id, i.list_id, i.media_type, i.tmdb_id, i.position, i.note, \
    m.title, m.poster_path, m.release_date, i.created_at";

pub struct ListRepo;

impl ListRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: UserId,
        input: &CreateList,
    ) -> Result<UserList, sqlx::Error> {
        let query = format!(
            "WITH l AS ( \
                 INSERT INTO user_lists (user_id, name, description, is_public) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING * \
             ) \
             SELECT {COLUMNS} FROM l"
        );
        sqlx::query_as::<_, UserList>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(input.description.as_deref())
            .bind(input.is_public)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<UserList>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_lists l WHERE l.id = $1");
        sqlx::query_as::<_, UserList>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A user's lists, newest first. Private lists only when requested.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
        include_private: bool,
    ) -> Result<Vec<UserList>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_lists l \
             WHERE l.user_id = $1 AND ($2 OR l.is_public) \
             ORDER BY l.created_at DESC, l.id DESC"
        );
        sqlx::query_as::<_, UserList>(&query)
            .bind(user_id)
            .bind(include_private)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateList,
    ) -> Result<Option<UserList>, sqlx::Error> {
        let (set_description, description) = patch_bind(&input.description);
        let query = format!(
            "WITH l AS ( \
                 UPDATE user_lists SET \
                     name = COALESCE($2, name), \
                     description = CASE WHEN $3 THEN $4 ELSE description END, \
                     is_public = COALESCE($5, is_public) \
                 WHERE id = $1 \
                 RETURNING * \
             ) \
             SELECT {COLUMNS} FROM l"
        );
        sqlx::query_as::<_, UserList>(&query)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(set_description)
            .bind(description)
            .bind(input.is_public)
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_lists WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Items in display order.
    pub async fn items(pool: &PgPool, list_id: DbId) -> Result<Vec<UserListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM user_list_items i \
             LEFT JOIN media_items m ON m.media_type = i.media_type AND m.tmdb_id = i.tmdb_id \
             WHERE i.list_id = $1 \
             ORDER BY i.position, i.id"
        );
        sqlx::query_as::<_, UserListItem>(&query)
            .bind(list_id)
            .fetch_all(pool)
            .await
    }

    /// Append a title to the end of a list.
    ///
    /// Adding a title already in the list keeps its position and returns the
    /// existing item.
    pub async fn add_item(
        pool: &PgPool,
        list_id: DbId,
        key: MediaKey,
        snapshot: &MediaSnapshot,
        note: Option<&str>,
    ) -> Result<UserListItem, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !snapshot.is_empty() {
            MediaRepo::upsert_snapshot(&mut *tx, key, snapshot).await?;
        }

        sqlx::query(
            "INSERT INTO user_list_items (list_id, media_type, tmdb_id, position, note) \
             SELECT $1, $2, $3, COALESCE(MAX(position) + 1, 0), $4 \
             FROM user_list_items WHERE list_id = $1 \
             ON CONFLICT (list_id, media_type, tmdb_id) DO NOTHING",
        )
        .bind(list_id)
        .bind(key.media_type.as_str())
        .bind(key.tmdb_id)
        .bind(note)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE user_lists SET updated_at = NOW() WHERE id = $1")
            .bind(list_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM user_list_items i \
             LEFT JOIN media_items m ON m.media_type = i.media_type AND m.tmdb_id = i.tmdb_id \
             WHERE i.list_id = $1 AND i.media_type = $2 AND i.tmdb_id = $3"
        );
        let item = sqlx::query_as::<_, UserListItem>(&query)
            .bind(list_id)
            .bind(key.media_type.as_str())
            .bind(key.tmdb_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(item)
    }

    /// Returns `true` if a row was deleted.
    pub async fn remove_item(
        pool: &PgPool,
        list_id: DbId,
        key: MediaKey,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM user_list_items WHERE list_id = $1 AND media_type = $2 AND tmdb_id = $3",
        )
        .bind(list_id)
        .bind(key.media_type.as_str())
        .bind(key.tmdb_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_items(pool: &PgPool, list_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM user_list_items WHERE list_id = $1")
            .bind(list_id)
            .fetch_one(pool)
            .await
    }

    /// Whether the list contains the title.
    pub async fn contains(
        pool: &PgPool,
        list_id: DbId,
        key: MediaKey,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM user_list_items \
                           WHERE list_id = $1 AND media_type = $2 AND tmdb_id = $3)",
        )
        .bind(list_id)
        .bind(key.media_type.as_str())
        .bind(key.tmdb_id)
        .fetch_one(pool)
        .await
    }
}
