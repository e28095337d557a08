use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Page, StoreResult};
use crate::domain::models::{AuthorColumns, Post, PostWithProfile};

#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts, newest first
    async fn list_timeline(&self, page: Page) -> StoreResult<Vec<PostWithProfile>>;

    /// One user's posts, newest first
    async fn list_by_user(&self, user_id: Uuid, page: Page) -> StoreResult<Vec<PostWithProfile>>;

    async fn get_post(&self, post_id: Uuid) -> StoreResult<Option<PostWithProfile>>;

    async fn create_post(&self, user_id: Uuid, content: &str) -> StoreResult<Post>;
}

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    #[sqlx(flatten)]
    post: Post,
    #[sqlx(flatten)]
    author: AuthorColumns,
}

impl From<PostRow> for PostWithProfile {
    fn from(row: PostRow) -> Self {
        PostWithProfile {
            post: row.post,
            profile: row.author.into_profile(),
        }
    }
}

const SELECT_POST_WITH_PROFILE: &str = r#"
    SELECT p.id, p.user_id, p.content, p.created_at,
           pr.id AS profile_id,
           pr.name AS profile_name,
           pr.introduction AS profile_introduction,
           pr.icon AS profile_icon
    FROM posts p
    LEFT JOIN profile pr ON pr.id = p.user_id
"#;

#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn list_timeline(&self, page: Page) -> StoreResult<Vec<PostWithProfile>> {
        let query = format!(
            "{SELECT_POST_WITH_PROFILE} ORDER BY p.created_at DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, PostRow>(&query)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_by_user(&self, user_id: Uuid, page: Page) -> StoreResult<Vec<PostWithProfile>> {
        let query = format!(
            "{SELECT_POST_WITH_PROFILE} WHERE p.user_id = $1 ORDER BY p.created_at DESC LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, PostRow>(&query)
            .bind(user_id)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_post(&self, post_id: Uuid) -> StoreResult<Option<PostWithProfile>> {
        let query = format!("{SELECT_POST_WITH_PROFILE} WHERE p.id = $1");
        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn create_post(&self, user_id: Uuid, content: &str) -> StoreResult<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (user_id, content)
            VALUES ($1, $2)
            RETURNING id, user_id, content, created_at
            "#,
        )
        .bind(user_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }
}
