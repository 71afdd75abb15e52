//! Repository for the `media_items` metadata cache.

use letssee_core::media::{MediaKey, MediaSnapshot};

pub struct MediaRepo;

impl MediaRepo {
    /// Insert or refresh the snapshot for a title.
    ///
    /// Fields missing from `snapshot` keep their stored values.
    pub async fn upsert_snapshot<'e, E>(
        executor: E,
        key: MediaKey,
        snapshot: &MediaSnapshot,
    ) -> Result<(), sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        sqlx::query(
            "INSERT INTO media_items (media_type, tmdb_id, title, poster_path, release_date) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (media_type, tmdb_id) DO UPDATE SET \
                 title = COALESCE(EXCLUDED.title, media_items.title), \
                 poster_path = COALESCE(EXCLUDED.poster_path, media_items.poster_path), \
                 release_date = COALESCE(EXCLUDED.release_date, media_items.release_date)",
        )
        .bind(key.media_type.as_str())
        .bind(key.tmdb_id)
        .bind(snapshot.title.as_deref())
        .bind(snapshot.poster_path.as_deref())
        .bind(snapshot.release_date.as_deref())
        .execute(executor)
        .await?;
        Ok(())
    }
}
