use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Follow counts, always recomputed from the follows table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowCounts {
    /// Users this user follows
    pub following: i64,
    /// Users following this user
    pub followers: i64,
}

/// Profile entity - keyed by the auth provider's user id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub introduction: Option<String>,
    pub icon: Option<String>,
}

/// Fields a user may change on their own profile
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub name: String,
    pub introduction: Option<String>,
    pub icon: Option<String>,
}

/// Post entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Post joined with its author's profile (absent if the profile row is missing)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostWithProfile {
    #[serde(flatten)]
    pub post: Post,
    pub profile: Option<Profile>,
}

/// Reply entity - a reply to a post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reply {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyWithProfile {
    #[serde(flatten)]
    pub reply: Reply,
    pub profile: Option<Profile>,
}

/// Flat row shape of the `LEFT JOIN profile` queries.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AuthorColumns {
    pub profile_id: Option<Uuid>,
    pub profile_name: Option<String>,
    pub profile_introduction: Option<String>,
    pub profile_icon: Option<String>,
}

impl AuthorColumns {
    pub(crate) fn into_profile(self) -> Option<Profile> {
        self.profile_id.map(|id| Profile {
            id,
            name: self.profile_name.unwrap_or_default(),
            introduction: self.profile_introduction,
            icon: self.profile_icon,
        })
    }
}
