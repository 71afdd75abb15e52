//! Repository for per-episode progress.

use letssee_core::episodes::{EpisodeKey, BACKFILL_CHUNK_SIZE};
use letssee_core::types::UserId;
use sqlx::PgPool;

use crate::models::episode::WatchedEpisode;

const COLUMNS: &str = "id, user_id, show_id, season_number, episode_number, watched_at";

pub struct EpisodeRepo;

impl EpisodeRepo {
    /// Mark one episode watched. Returns `false` when it already was.
    pub async fn mark(
        pool: &PgPool,
        user_id: UserId,
        show_id: i64,
        episode: EpisodeKey,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO watched_episodes (user_id, show_id, season_number, episode_number) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, show_id, season_number, episode_number) DO NOTHING",
        )
        .bind(user_id)
        .bind(show_id)
        .bind(episode.season_number)
        .bind(episode.episode_number)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns `true` if a row was deleted.
    pub async fn unmark(
        pool: &PgPool,
        user_id: UserId,
        show_id: i64,
        episode: EpisodeKey,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM watched_episodes \
             WHERE user_id = $1 AND show_id = $2 AND season_number = $3 AND episode_number = $4",
        )
        .bind(user_id)
        .bind(show_id)
        .bind(episode.season_number)
        .bind(episode.episode_number)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_for_show(
        pool: &PgPool,
        user_id: UserId,
        show_id: i64,
    ) -> Result<Vec<WatchedEpisode>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM watched_episodes WHERE user_id = $1 AND show_id = $2 \
             ORDER BY season_number, episode_number"
        );
        sqlx::query_as::<_, WatchedEpisode>(&query)
            .bind(user_id)
            .bind(show_id)
            .fetch_all(pool)
            .await
    }

    /// Insert many episodes, [`BACKFILL_CHUNK_SIZE`] rows per statement.
    ///
    /// Already-watched episodes are skipped. Returns the number of new rows.
    pub async fn bulk_mark(
        pool: &PgPool,
        user_id: UserId,
        show_id: i64,
        episodes: &[EpisodeKey],
    ) -> Result<u64, sqlx::Error> {
        let mut inserted = 0;
        for chunk in episodes.chunks(BACKFILL_CHUNK_SIZE) {
            let seasons: Vec<i32> = chunk.iter().map(|e| e.season_number).collect();
            let numbers: Vec<i32> = chunk.iter().map(|e| e.episode_number).collect();

            let result = sqlx::query(
                "INSERT INTO watched_episodes (user_id, show_id, season_number, episode_number) \
                 SELECT $1, $2, s, e FROM UNNEST($3::INT[], $4::INT[]) AS t(s, e) \
                 ON CONFLICT (user_id, show_id, season_number, episode_number) DO NOTHING",
            )
            .bind(user_id)
            .bind(show_id)
            .bind(&seasons)
            .bind(&numbers)
            .execute(pool)
            .await?;
            inserted += result.rows_affected();
        }
        tracing::debug!(%user_id, show_id, requested = episodes.len(), inserted, "Episodes bulk marked");
        Ok(inserted)
    }

    /// Remove all progress for a show. Returns the number of rows deleted.
    pub async fn clear_show(
        pool: &PgPool,
        user_id: UserId,
        show_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM watched_episodes WHERE user_id = $1 AND show_id = $2")
                .bind(user_id)
                .bind(show_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
