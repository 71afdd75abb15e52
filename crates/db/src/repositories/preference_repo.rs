//! Repository for the four per-user collections and their counters.
//!
//! Watched memberships live in `watched_items` (which also carries rating,
//! diary and review); the other three live in plain membership tables.

use letssee_core::media::{MediaKey, MediaSnapshot};
use letssee_core::preferences::{
    plan_disable, plan_enable, plan_toggle, PreferenceKind, PreferenceState, TogglePlan,
};
use letssee_core::types::UserId;
use sqlx::{PgPool, Postgres, Transaction};

use super::MediaRepo;
use crate::models::media::LibraryEntry;

/// Membership table backing each collection.
pub fn membership_table(kind: PreferenceKind) -> &'static str {
    match kind {
        PreferenceKind::Watched => "watched_items",
        PreferenceKind::Favorite => "favorite_items",
        PreferenceKind::Watchlist => "watchlist_items",
        PreferenceKind::Watching => "currently_watching",
    }
}

/// `user_stats` column counting each collection.
fn counter_column(kind: PreferenceKind) -> &'static str {
    match kind {
        PreferenceKind::Watched => "watched_count",
        PreferenceKind::Favorite => "favorites_count",
        PreferenceKind::Watchlist => "watchlist_count",
        PreferenceKind::Watching => "watching_count",
    }
}

/// Result of executing a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceChange {
    pub before: PreferenceState,
    pub after: PreferenceState,
    pub plan: TogglePlan,
}

impl PreferenceChange {
    pub fn removed(&self, kind: PreferenceKind) -> bool {
        self.before.get(kind) && !self.after.get(kind)
    }
}

pub struct PreferenceRepo;

impl PreferenceRepo {
    /// Current membership of one title across all four collections.
    pub async fn get_state(
        pool: &PgPool,
        user_id: UserId,
        key: MediaKey,
    ) -> Result<PreferenceState, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::read_state(&mut conn, user_id, key).await
    }

    /// Flip one collection, evicting its competitors when turning it on.
    pub async fn toggle(
        pool: &PgPool,
        user_id: UserId,
        key: MediaKey,
        kind: PreferenceKind,
        snapshot: &MediaSnapshot,
    ) -> Result<PreferenceChange, sqlx::Error> {
        Self::run(pool, user_id, key, snapshot, |state| plan_toggle(state, kind)).await
    }

    /// Turn one collection on. No-op when it already is.
    pub async fn enable(
        pool: &PgPool,
        user_id: UserId,
        key: MediaKey,
        kind: PreferenceKind,
        snapshot: &MediaSnapshot,
    ) -> Result<PreferenceChange, sqlx::Error> {
        Self::run(pool, user_id, key, snapshot, |state| plan_enable(state, kind)).await
    }

    /// Turn one collection off. No-op when it already is.
    pub async fn disable(
        pool: &PgPool,
        user_id: UserId,
        key: MediaKey,
        kind: PreferenceKind,
    ) -> Result<PreferenceChange, sqlx::Error> {
        Self::run(pool, user_id, key, &MediaSnapshot::default(), |state| {
            plan_disable(state, kind)
        })
        .await
    }

    /// One page of a collection, newest first, joined with cached metadata.
    pub async fn list_library(
        pool: &PgPool,
        user_id: UserId,
        kind: PreferenceKind,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LibraryEntry>, sqlx::Error> {
        let table = membership_table(kind);
        let watched_columns = if kind == PreferenceKind::Watched {
            "t.rating, t.review_text, t.diary_text"
        } else {
            "NULL::DOUBLE PRECISION AS rating, NULL::TEXT AS review_text, NULL::TEXT AS diary_text"
        };
        let query = format!(
            "SELECT t.id, t.media_type, t.tmdb_id, m.title, m.poster_path, m.release_date, \
                    {watched_columns}, t.created_at AS added_at \
             FROM {table} t \
             LEFT JOIN media_items m \
                 ON m.media_type = t.media_type AND m.tmdb_id = t.tmdb_id \
             WHERE t.user_id = $1 \
             ORDER BY t.created_at DESC, t.id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, LibraryEntry>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    // ---- private helpers ----

    /// Read the state, plan, and execute inside one transaction.
    ///
    /// Counters move by the rows actually inserted or deleted, so concurrent
    /// toggles cannot drift them.
    async fn run<F>(
        pool: &PgPool,
        user_id: UserId,
        key: MediaKey,
        snapshot: &MediaSnapshot,
        planner: F,
    ) -> Result<PreferenceChange, sqlx::Error>
    where
        F: FnOnce(PreferenceState) -> TogglePlan,
    {
        let mut tx = pool.begin().await?;

        let before = Self::read_state(&mut tx, user_id, key).await?;
        let plan = planner(before);

        if !snapshot.is_empty() {
            MediaRepo::upsert_snapshot(&mut *tx, key, snapshot).await?;
        }

        for kind in &plan.remove {
            if Self::delete_membership(&mut tx, user_id, key, *kind).await? {
                Self::adjust_counter(&mut tx, user_id, *kind, -1).await?;
            }
        }
        if let Some(kind) = plan.insert {
            if Self::insert_membership(&mut tx, user_id, key, kind).await? {
                Self::adjust_counter(&mut tx, user_id, kind, 1).await?;
            }
        }

        tx.commit().await?;

        let after = before.apply(&plan);
        tracing::debug!(
            %user_id,
            media = %key,
            inserted = ?plan.insert,
            removed = ?plan.remove,
            "Preference plan executed",
        );
        Ok(PreferenceChange {
            before,
            after,
            plan,
        })
    }

    async fn read_state(
        conn: &mut sqlx::PgConnection,
        user_id: UserId,
        key: MediaKey,
    ) -> Result<PreferenceState, sqlx::Error> {
        let (watched, favorite, watchlist, watching): (bool, bool, bool, bool) = sqlx::query_as(
            "SELECT \
                 EXISTS(SELECT 1 FROM watched_items \
                        WHERE user_id = $1 AND media_type = $2 AND tmdb_id = $3), \
                 EXISTS(SELECT 1 FROM favorite_items \
                        WHERE user_id = $1 AND media_type = $2 AND tmdb_id = $3), \
                 EXISTS(SELECT 1 FROM watchlist_items \
                        WHERE user_id = $1 AND media_type = $2 AND tmdb_id = $3), \
                 EXISTS(SELECT 1 FROM currently_watching \
                        WHERE user_id = $1 AND media_type = $2 AND tmdb_id = $3)",
        )
        .bind(user_id)
        .bind(key.media_type.as_str())
        .bind(key.tmdb_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(PreferenceState {
            watched,
            favorite,
            watchlist,
            watching,
        })
    }

    async fn insert_membership(
        tx: &mut Transaction<'_, Postgres>,
        user_id: UserId,
        key: MediaKey,
        kind: PreferenceKind,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "INSERT INTO {} (user_id, media_type, tmdb_id) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, media_type, tmdb_id) DO NOTHING",
            membership_table(kind)
        );
        let result = sqlx::query(&query)
            .bind(user_id)
            .bind(key.media_type.as_str())
            .bind(key.tmdb_id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_membership(
        tx: &mut Transaction<'_, Postgres>,
        user_id: UserId,
        key: MediaKey,
        kind: PreferenceKind,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "DELETE FROM {} WHERE user_id = $1 AND media_type = $2 AND tmdb_id = $3",
            membership_table(kind)
        );
        let result = sqlx::query(&query)
            .bind(user_id)
            .bind(key.media_type.as_str())
            .bind(key.tmdb_id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn adjust_counter(
        tx: &mut Transaction<'_, Postgres>,
        user_id: UserId,
        kind: PreferenceKind,
        delta: i32,
    ) -> Result<(), sqlx::Error> {
        let column = counter_column(kind);
        let query = format!(
            "INSERT INTO user_stats (user_id, {column}) VALUES ($1, GREATEST($2, 0)) \
             ON CONFLICT (user_id) DO UPDATE \
             SET {column} = GREATEST(user_stats.{column} + $2, 0)"
        );
        sqlx::query(&query)
            .bind(user_id)
            .bind(delta)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
