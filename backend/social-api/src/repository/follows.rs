use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::StoreResult;

/// Access to the `follows` relationship table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowStore: Send + Sync {
    /// Insert the (follower, following) row. A duplicate pair fails with
    /// `StoreError::UniqueViolation`.
    async fn insert_follow(&self, follower_id: Uuid, following_id: Uuid) -> StoreResult<()>;

    /// Delete the matching row, returning the number of rows removed.
    async fn delete_follow(&self, follower_id: Uuid, following_id: Uuid) -> StoreResult<u64>;

    async fn follow_exists(&self, follower_id: Uuid, following_id: Uuid) -> StoreResult<bool>;

    /// Rows where `user_id` is the follower
    async fn count_following(&self, user_id: Uuid) -> StoreResult<i64>;

    /// Rows where `user_id` is the one being followed
    async fn count_followers(&self, user_id: Uuid) -> StoreResult<i64>;
}

#[derive(Clone)]
pub struct PgFollowStore {
    pool: PgPool,
}

impl PgFollowStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowStore for PgFollowStore {
    async fn insert_follow(&self, follower_id: Uuid, following_id: Uuid) -> StoreResult<()> {
        // No ON CONFLICT: the unique violation is how a repeated follow is reported
        sqlx::query(
            r#"
            INSERT INTO follows (follower_id, following_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(follower_id)
        .bind(following_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_follow(&self, follower_id: Uuid, following_id: Uuid) -> StoreResult<u64> {
        let affected = sqlx::query(
            r#"
            DELETE FROM follows
            WHERE follower_id = $1 AND following_id = $2
            "#,
        )
        .bind(follower_id)
        .bind(following_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected)
    }

    async fn follow_exists(&self, follower_id: Uuid, following_id: Uuid) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM follows
                WHERE follower_id = $1 AND following_id = $2
            )
            "#,
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn count_following(&self, user_id: Uuid) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count_followers(&self, user_id: Uuid) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE following_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
