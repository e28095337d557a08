use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Page, StoreResult};
use crate::domain::models::{AuthorColumns, Reply, ReplyWithProfile};

#[async_trait]
pub trait ReplyStore: Send + Sync {
    /// Replies to a post, newest first
    async fn list_for_post(&self, post_id: Uuid, page: Page) -> StoreResult<Vec<ReplyWithProfile>>;

    /// Fails with `StoreError::ForeignKeyViolation` when the post or user is unknown.
    async fn create_reply(&self, user_id: Uuid, post_id: Uuid, content: &str) -> StoreResult<Reply>;
}

#[derive(Debug, sqlx::FromRow)]
struct ReplyRow {
    #[sqlx(flatten)]
    reply: Reply,
    #[sqlx(flatten)]
    author: AuthorColumns,
}

#[derive(Clone)]
pub struct PgReplyStore {
    pool: PgPool,
}

impl PgReplyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReplyStore for PgReplyStore {
    async fn list_for_post(&self, post_id: Uuid, page: Page) -> StoreResult<Vec<ReplyWithProfile>> {
        let rows = sqlx::query_as::<_, ReplyRow>(
            r#"
            SELECT r.id, r.post_id, r.user_id, r.content, r.created_at,
                   pr.id AS profile_id,
                   pr.name AS profile_name,
                   pr.introduction AS profile_introduction,
                   pr.icon AS profile_icon
            FROM replies r
            LEFT JOIN profile pr ON pr.id = r.user_id
            WHERE r.post_id = $1
            ORDER BY r.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(post_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ReplyWithProfile {
                reply: row.reply,
                profile: row.author.into_profile(),
            })
            .collect())
    }

    async fn create_reply(&self, user_id: Uuid, post_id: Uuid, content: &str) -> StoreResult<Reply> {
        let reply = sqlx::query_as::<_, Reply>(
            r#"
            INSERT INTO replies (user_id, post_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, post_id, user_id, content, created_at
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(reply)
    }
}
