use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::StoreResult;
use crate::domain::models::{Profile, ProfileUpdate};

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>>;

    /// Returns `None` when the user has no profile row.
    async fn update_profile(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> StoreResult<Option<Profile>>;
}

#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            "SELECT id, name, introduction, icon FROM profile WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> StoreResult<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profile
            SET name = $2, introduction = $3, icon = $4
            WHERE id = $1
            RETURNING id, name, introduction, icon
            "#,
        )
        .bind(user_id)
        .bind(&update.name)
        .bind(&update.introduction)
        .bind(&update.icon)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }
}
