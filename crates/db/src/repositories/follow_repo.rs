//! Repository for follow requests and accepted connections.

use letssee_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::follow::{Connection, FollowRequest, FollowRequestView};
use crate::models::profile::ProfileSummary;

const REQUEST_COLUMNS: &str = "id, requester_id, target_id, created_at";
const CONNECTION_COLUMNS: &str = "id, follower_id, followee_id, created_at";

pub struct FollowRepo;

impl FollowRepo {
    pub async fn is_following(
        pool: &PgPool,
        follower_id: UserId,
        followee_id: UserId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM connections WHERE follower_id = $1 AND followee_id = $2)",
        )
        .bind(follower_id)
        .bind(followee_id)
        .fetch_one(pool)
        .await
    }

    pub async fn has_pending_request(
        pool: &PgPool,
        requester_id: UserId,
        target_id: UserId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM follow_requests \
                           WHERE requester_id = $1 AND target_id = $2)",
        )
        .bind(requester_id)
        .bind(target_id)
        .fetch_one(pool)
        .await
    }

    /// Connected in either direction.
    pub async fn are_connected(pool: &PgPool, a: UserId, b: UserId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM connections \
                           WHERE (follower_id = $1 AND followee_id = $2) \
                              OR (follower_id = $2 AND followee_id = $1))",
        )
        .bind(a)
        .bind(b)
        .fetch_one(pool)
        .await
    }

    /// Create a connection directly. Returns `true` when it is new.
    pub async fn follow(
        pool: &PgPool,
        follower_id: UserId,
        followee_id: UserId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let created = sqlx::query(
            "INSERT INTO connections (follower_id, followee_id) VALUES ($1, $2) \
             ON CONFLICT (follower_id, followee_id) DO NOTHING",
        )
        .bind(follower_id)
        .bind(followee_id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        // A stale request from before the target went public is now moot.
        sqlx::query("DELETE FROM follow_requests WHERE requester_id = $1 AND target_id = $2")
            .bind(follower_id)
            .bind(followee_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Create a pending request. Returns `None` when one already exists.
    pub async fn request(
        pool: &PgPool,
        requester_id: UserId,
        target_id: UserId,
    ) -> Result<Option<FollowRequest>, sqlx::Error> {
        let query = format!(
            "INSERT INTO follow_requests (requester_id, target_id) VALUES ($1, $2) \
             ON CONFLICT (requester_id, target_id) DO NOTHING \
             RETURNING {REQUEST_COLUMNS}"
        );
        sqlx::query_as::<_, FollowRequest>(&query)
            .bind(requester_id)
            .bind(target_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete the connection and any pending request. Returns `true` if
    /// anything was removed.
    pub async fn unfollow(
        pool: &PgPool,
        follower_id: UserId,
        followee_id: UserId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let connections = sqlx::query(
            "DELETE FROM connections WHERE follower_id = $1 AND followee_id = $2",
        )
        .bind(follower_id)
        .bind(followee_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let requests =
            sqlx::query("DELETE FROM follow_requests WHERE requester_id = $1 AND target_id = $2")
                .bind(follower_id)
                .bind(followee_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

        tx.commit().await?;
        Ok(connections + requests > 0)
    }

    pub async fn find_request(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<FollowRequest>, sqlx::Error> {
        let query = format!("SELECT {REQUEST_COLUMNS} FROM follow_requests WHERE id = $1");
        sqlx::query_as::<_, FollowRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Turn a request into a connection in one transaction.
    ///
    /// Returns `None` when the request no longer exists.
    pub async fn accept(pool: &PgPool, request_id: DbId) -> Result<Option<Connection>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let request: Option<(UserId, UserId)> = sqlx::query_as(
            "DELETE FROM follow_requests WHERE id = $1 RETURNING requester_id, target_id",
        )
        .bind(request_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((requester_id, target_id)) = request else {
            return Ok(None);
        };

        // The upsert touches the row so RETURNING yields it even when it existed.
        let query = format!(
            "INSERT INTO connections (follower_id, followee_id) VALUES ($1, $2) \
             ON CONFLICT (follower_id, followee_id) DO UPDATE SET updated_at = NOW() \
             RETURNING {CONNECTION_COLUMNS}"
        );
        let connection = sqlx::query_as::<_, Connection>(&query)
            .bind(requester_id)
            .bind(target_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(connection))
    }

    /// Returns `true` if a row was deleted.
    pub async fn decline(pool: &PgPool, request_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM follow_requests WHERE id = $1")
            .bind(request_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Pending requests addressed to the user, with the requester's profile.
    pub async fn incoming(
        pool: &PgPool,
        target_id: UserId,
    ) -> Result<Vec<FollowRequestView>, sqlx::Error> {
        sqlx::query_as::<_, FollowRequestView>(
            "SELECT r.id, p.id AS user_id, p.username, p.display_name, p.avatar_url, r.created_at \
             FROM follow_requests r JOIN profiles p ON p.id = r.requester_id \
             WHERE r.target_id = $1 \
             ORDER BY r.created_at DESC, r.id DESC",
        )
        .bind(target_id)
        .fetch_all(pool)
        .await
    }

    /// Pending requests sent by the user, with the target's profile.
    pub async fn outgoing(
        pool: &PgPool,
        requester_id: UserId,
    ) -> Result<Vec<FollowRequestView>, sqlx::Error> {
        sqlx::query_as::<_, FollowRequestView>(
            "SELECT r.id, p.id AS user_id, p.username, p.display_name, p.avatar_url, r.created_at \
             FROM follow_requests r JOIN profiles p ON p.id = r.target_id \
             WHERE r.requester_id = $1 \
             ORDER BY r.created_at DESC, r.id DESC",
        )
        .bind(requester_id)
        .fetch_all(pool)
        .await
    }

    pub async fn followers(
        pool: &PgPool,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProfileSummary>, sqlx::Error> {
        sqlx::query_as::<_, ProfileSummary>(
            "SELECT p.id, p.username, p.display_name, p.avatar_url \
             FROM connections c JOIN profiles p ON p.id = c.follower_id \
             WHERE c.followee_id = $1 \
             ORDER BY c.created_at DESC, c.id DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    pub async fn following(
        pool: &PgPool,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProfileSummary>, sqlx::Error> {
        sqlx::query_as::<_, ProfileSummary>(
            "SELECT p.id, p.username, p.display_name, p.avatar_url \
             FROM connections c JOIN profiles p ON p.id = c.followee_id \
             WHERE c.follower_id = $1 \
             ORDER BY c.created_at DESC, c.id DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }
}
