//! Repository for `profiles` and `user_stats`.

use letssee_core::profiles::default_username;
use letssee_core::types::UserId;
use sqlx::PgPool;

use super::patch_bind;
use crate::models::profile::{Profile, SocialCounts, UpsertProfile, UserStats};

const COLUMNS: &str = "\
    id, username, display_name, avatar_url, bio, visibility, \
    featured_list_id, featured_review_id, created_at, updated_at";

pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn find_by_id(pool: &PgPool, id: UserId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Case-insensitive username lookup.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE LOWER(username) = LOWER($1)");
        sqlx::query_as::<_, Profile>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Create the profile and counter rows if they do not exist yet.
    ///
    /// Returns `true` when a new profile was created.
    pub async fn ensure(
        pool: &PgPool,
        id: UserId,
        default_username: &str,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let created = sqlx::query(
            "INSERT INTO profiles (id, username) VALUES ($1, $2) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(id)
        .bind(default_username)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        sqlx::query("INSERT INTO user_stats (user_id) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Insert or patch a profile.
    ///
    /// Unique username violations surface as a database error on the
    /// `uq_profiles_username` index.
    pub async fn upsert(
        pool: &PgPool,
        id: UserId,
        input: &UpsertProfile,
    ) -> Result<Profile, sqlx::Error> {
        let (set_display, display_name) = patch_bind(&input.display_name);
        let (set_avatar, avatar_url) = patch_bind(&input.avatar_url);
        let (set_bio, bio) = patch_bind(&input.bio);
        let (set_list, featured_list_id) = patch_bind(&input.featured_list_id);
        let (set_review, featured_review_id) = patch_bind(&input.featured_review_id);
        let insert_username = input
            .username
            .clone()
            .unwrap_or_else(|| default_username(id));

        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO profiles \
                 (id, username, display_name, avatar_url, bio, visibility, \
                  featured_list_id, featured_review_id) \
             VALUES ($1, $14, $4, $6, $8, COALESCE($9, 'public'), $11, $13) \
             ON CONFLICT (id) DO UPDATE SET \
                 username = COALESCE($2, profiles.username), \
                 display_name = CASE WHEN $3 THEN $4 ELSE profiles.display_name END, \
                 avatar_url = CASE WHEN $5 THEN $6 ELSE profiles.avatar_url END, \
                 bio = CASE WHEN $7 THEN $8 ELSE profiles.bio END, \
                 visibility = COALESCE($9, profiles.visibility), \
                 featured_list_id = CASE WHEN $10 THEN $11 ELSE profiles.featured_list_id END, \
                 featured_review_id = CASE WHEN $12 THEN $13 ELSE profiles.featured_review_id END \
             RETURNING {COLUMNS}"
        );
        let profile = sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(input.username.as_deref())
            .bind(set_display)
            .bind(display_name)
            .bind(set_avatar)
            .bind(avatar_url)
            .bind(set_bio)
            .bind(bio)
            .bind(input.visibility.map(|v| v.as_str()))
            .bind(set_list)
            .bind(featured_list_id)
            .bind(set_review)
            .bind(featured_review_id)
            .bind(insert_username)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO user_stats (user_id) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(profile)
    }

    /// Library counters. Missing rows read as zero.
    pub async fn stats(pool: &PgPool, id: UserId) -> Result<UserStats, sqlx::Error> {
        let stats = sqlx::query_as::<_, UserStats>(
            "SELECT watched_count, favorites_count, watchlist_count, watching_count \
             FROM user_stats WHERE user_id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(stats.unwrap_or_default())
    }

    /// Follower, following and list counts.
    ///
    /// `include_private_lists` decides whether private lists are counted.
    pub async fn social_counts(
        pool: &PgPool,
        id: UserId,
        include_private_lists: bool,
    ) -> Result<SocialCounts, sqlx::Error> {
        sqlx::query_as::<_, SocialCounts>(
            "SELECT \
                 (SELECT COUNT(*) FROM connections WHERE followee_id = $1) AS followers_count, \
                 (SELECT COUNT(*) FROM connections WHERE follower_id = $1) AS following_count, \
                 (SELECT COUNT(*) FROM user_lists \
                  WHERE user_id = $1 AND (is_public OR $2)) AS lists_count",
        )
        .bind(id)
        .bind(include_private_lists)
        .fetch_one(pool)
        .await
    }
}
