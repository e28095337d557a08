use std::sync::Arc;

use sqlx::PgPool;

use crate::repository::{
    FollowStore, PgFollowStore, PgPostStore, PgProfileStore, PgReplyStore, PostStore,
    ProfileStore, ReplyStore,
};
use crate::services::FollowService;

/// Shared handler state. Holds no mutable data of its own.
#[derive(Clone)]
pub struct AppState {
    pub follows: FollowService,
    pub posts: Arc<dyn PostStore>,
    pub replies: Arc<dyn ReplyStore>,
    pub profiles: Arc<dyn ProfileStore>,
}

impl AppState {
    pub fn new(
        follows: Arc<dyn FollowStore>,
        posts: Arc<dyn PostStore>,
        replies: Arc<dyn ReplyStore>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        Self {
            follows: FollowService::new(follows),
            posts,
            replies,
            profiles,
        }
    }

    /// PostgreSQL-backed state
    pub fn from_pool(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PgFollowStore::new(pool.clone())),
            Arc::new(PgPostStore::new(pool.clone())),
            Arc::new(PgReplyStore::new(pool.clone())),
            Arc::new(PgProfileStore::new(pool)),
        )
    }
}
