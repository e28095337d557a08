//! Shared fixtures for HTTP tests: an in-memory store that honours the unique and
//! foreign-key constraints of the PostgreSQL schema, and minted access tokens.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use uuid::Uuid;

use actix_middleware::Claims;
use social_api::domain::models::{
    Post, PostWithProfile, Profile, ProfileUpdate, Reply, ReplyWithProfile,
};
use social_api::repository::{
    FollowStore, Page, PostStore, ProfileStore, ReplyStore, StoreError, StoreResult,
};
use social_api::AppState;

pub const SECRET: &str = "integration-secret";
pub const AUDIENCE: &str = "authenticated";
pub const COOKIE: &str = "sb-access-token";

/// Builds an initialized test service wired like `main`, minus the database.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(actix_middleware::SessionMiddleware::new(
                    actix_middleware::SessionVerifier::new(common::SECRET, common::AUDIENCE),
                    common::COOKIE,
                ))
                .app_data(actix_web::web::Data::new($state))
                .configure(social_api::routes::configure_routes),
        )
        .await
    };
}

pub fn mint_token(user_id: Uuid) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: Utc::now().timestamp() + 3600,
        aud: Some(AUDIENCE.to_string()),
        email: Some(format!("{}@example.com", user_id)),
        role: Some("authenticated".to_string()),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("encode test token")
}

pub fn bearer(user_id: Uuid) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", mint_token(user_id)))
}

#[derive(Default)]
struct Tables {
    profiles: BTreeMap<Uuid, Profile>,
    posts: Vec<Post>,
    replies: Vec<Reply>,
    follows: HashSet<(Uuid, Uuid)>,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AppState {
        AppState::new(
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            Arc::new(self.clone()),
        )
    }

    pub fn add_user(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.lock().unwrap().profiles.insert(
            id,
            Profile {
                id,
                name: name.to_string(),
                introduction: None,
                icon: None,
            },
        );
        id
    }

    pub fn add_post(&self, user_id: Uuid, content: &str) -> Uuid {
        let post = Post {
            id: Uuid::new_v4(),
            user_id,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        let id = post.id;
        self.tables.lock().unwrap().posts.push(post);
        id
    }

    pub fn follow_rows(&self) -> usize {
        self.tables.lock().unwrap().follows.len()
    }

    fn with_profile<T>(&self, tables: &Tables, user_id: Uuid, item: T) -> (T, Option<Profile>) {
        (item, tables.profiles.get(&user_id).cloned())
    }
}

fn paginate<T>(mut items: Vec<T>, page: Page) -> Vec<T> {
    let start = (page.offset as usize).min(items.len());
    let end = (start + page.limit as usize).min(items.len());
    items.drain(start..end).collect()
}

#[async_trait]
impl FollowStore for InMemoryStore {
    async fn insert_follow(&self, follower_id: Uuid, following_id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.profiles.contains_key(&follower_id) || !tables.profiles.contains_key(&following_id) {
            return Err(StoreError::ForeignKeyViolation("follows_following_id_fkey".to_string()));
        }
        if !tables.follows.insert((follower_id, following_id)) {
            return Err(StoreError::UniqueViolation(
                "follows_follower_following_key".to_string(),
            ));
        }
        Ok(())
    }

    async fn delete_follow(&self, follower_id: Uuid, following_id: Uuid) -> StoreResult<u64> {
        let removed = self
            .tables
            .lock()
            .unwrap()
            .follows
            .remove(&(follower_id, following_id));
        Ok(removed as u64)
    }

    async fn follow_exists(&self, follower_id: Uuid, following_id: Uuid) -> StoreResult<bool> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .follows
            .contains(&(follower_id, following_id)))
    }

    async fn count_following(&self, user_id: Uuid) -> StoreResult<i64> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.follows.iter().filter(|(f, _)| *f == user_id).count() as i64)
    }

    async fn count_followers(&self, user_id: Uuid) -> StoreResult<i64> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.follows.iter().filter(|(_, t)| *t == user_id).count() as i64)
    }
}

#[async_trait]
impl PostStore for InMemoryStore {
    async fn list_timeline(&self, page: Page) -> StoreResult<Vec<PostWithProfile>> {
        let tables = self.tables.lock().unwrap();
        let mut posts: Vec<PostWithProfile> = tables
            .posts
            .iter()
            .map(|p| {
                let (post, profile) = self.with_profile(&tables, p.user_id, p.clone());
                PostWithProfile { post, profile }
            })
            .collect();
        posts.sort_by(|a, b| b.post.created_at.cmp(&a.post.created_at));
        Ok(paginate(posts, page))
    }

    async fn list_by_user(&self, user_id: Uuid, page: Page) -> StoreResult<Vec<PostWithProfile>> {
        let mut posts = self.list_timeline(Page::new(Some(Page::MAX_LIMIT), None)).await?;
        posts.retain(|p| p.post.user_id == user_id);
        Ok(paginate(posts, page))
    }

    async fn get_post(&self, post_id: Uuid) -> StoreResult<Option<PostWithProfile>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.posts.iter().find(|p| p.id == post_id).map(|p| {
            let (post, profile) = self.with_profile(&tables, p.user_id, p.clone());
            PostWithProfile { post, profile }
        }))
    }

    async fn create_post(&self, user_id: Uuid, content: &str) -> StoreResult<Post> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.profiles.contains_key(&user_id) {
            return Err(StoreError::ForeignKeyViolation("posts_user_id_fkey".to_string()));
        }
        let post = Post {
            id: Uuid::new_v4(),
            user_id,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        tables.posts.push(post.clone());
        Ok(post)
    }
}

#[async_trait]
impl ReplyStore for InMemoryStore {
    async fn list_for_post(&self, post_id: Uuid, page: Page) -> StoreResult<Vec<ReplyWithProfile>> {
        let tables = self.tables.lock().unwrap();
        let mut replies: Vec<ReplyWithProfile> = tables
            .replies
            .iter()
            .filter(|r| r.post_id == post_id)
            .map(|r| {
                let (reply, profile) = self.with_profile(&tables, r.user_id, r.clone());
                ReplyWithProfile { reply, profile }
            })
            .collect();
        replies.sort_by(|a, b| b.reply.created_at.cmp(&a.reply.created_at));
        Ok(paginate(replies, page))
    }

    async fn create_reply(&self, user_id: Uuid, post_id: Uuid, content: &str) -> StoreResult<Reply> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.posts.iter().any(|p| p.id == post_id) {
            return Err(StoreError::ForeignKeyViolation("replies_post_id_fkey".to_string()));
        }
        if !tables.profiles.contains_key(&user_id) {
            return Err(StoreError::ForeignKeyViolation("replies_user_id_fkey".to_string()));
        }
        let reply = Reply {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        tables.replies.push(reply.clone());
        Ok(reply)
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn get_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        Ok(self.tables.lock().unwrap().profiles.get(&user_id).cloned())
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> StoreResult<Option<Profile>> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.profiles.get_mut(&user_id).map(|profile| {
            profile.name = update.name.clone();
            profile.introduction = update.introduction.clone();
            profile.icon = update.icon.clone();
            profile.clone()
        }))
    }
}
