//! Follow toggle and follow status/count reader.
//!
//! The current user is passed in explicitly (`None` for anonymous callers) so
//! every rule here can be exercised without an HTTP request.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use crate::domain::models::FollowCounts;
use crate::metrics::record_follow_event;
use crate::repository::{FollowStore, StoreError};

#[derive(Debug, Error)]
pub enum FollowError {
    #[error("Unauthorized")]
    Unauthenticated,

    #[error("{0}")]
    InvalidOperation(&'static str),

    #[error("Store failure: {0}")]
    InternalFailure(#[from] StoreError),
}

/// Result of a follow request. A repeated follow is not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    Created,
    AlreadyExists,
}

#[derive(Clone)]
pub struct FollowService {
    store: Arc<dyn FollowStore>,
}

impl FollowService {
    pub fn new(store: Arc<dyn FollowStore>) -> Self {
        Self { store }
    }

    /// Create the relationship `current_user -> target`.
    pub async fn create(
        &self,
        current_user: Option<Uuid>,
        target: Uuid,
    ) -> Result<FollowOutcome, FollowError> {
        let follower_id = current_user.ok_or(FollowError::Unauthenticated)?;
        if follower_id == target {
            record_follow_event("follow", "rejected");
            return Err(FollowError::InvalidOperation("Cannot follow yourself"));
        }

        match self.store.insert_follow(follower_id, target).await {
            Ok(()) => {
                record_follow_event("follow", "created");
                debug!(follower_id = %follower_id, following_id = %target, "Follow created");
                Ok(FollowOutcome::Created)
            }
            Err(StoreError::UniqueViolation(_)) => {
                record_follow_event("follow", "already_exists");
                Ok(FollowOutcome::AlreadyExists)
            }
            Err(e) => {
                record_follow_event("follow", "failed");
                error!(
                    follower_id = %follower_id,
                    following_id = %target,
                    error = %e,
                    "Follow insert failed"
                );
                Err(FollowError::InternalFailure(e))
            }
        }
    }

    /// Remove the relationship `current_user -> target`. Removing a relationship
    /// that does not exist succeeds.
    pub async fn remove(&self, current_user: Option<Uuid>, target: Uuid) -> Result<(), FollowError> {
        let follower_id = current_user.ok_or(FollowError::Unauthenticated)?;
        if follower_id == target {
            record_follow_event("unfollow", "rejected");
            return Err(FollowError::InvalidOperation("Cannot unfollow yourself"));
        }

        match self.store.delete_follow(follower_id, target).await {
            Ok(affected) => {
                let outcome = if affected > 0 { "removed" } else { "noop" };
                record_follow_event("unfollow", outcome);
                debug!(follower_id = %follower_id, following_id = %target, affected, "Unfollow completed");
                Ok(())
            }
            Err(e) => {
                record_follow_event("unfollow", "failed");
                error!(
                    follower_id = %follower_id,
                    following_id = %target,
                    error = %e,
                    "Follow delete failed"
                );
                Err(e.into())
            }
        }
    }

    /// Anonymous callers and self-targets are never following; no query is issued.
    pub async fn is_following(
        &self,
        current_user: Option<Uuid>,
        target: Uuid,
    ) -> Result<bool, FollowError> {
        let follower_id = match current_user {
            Some(id) if id != target => id,
            _ => return Ok(false),
        };

        self.store
            .follow_exists(follower_id, target)
            .await
            .map_err(|e| {
                error!(
                    follower_id = %follower_id,
                    following_id = %target,
                    error = %e,
                    "Follow lookup failed"
                );
                FollowError::InternalFailure(e)
            })
    }

    pub async fn count_following(&self, user_id: Uuid) -> Result<i64, FollowError> {
        self.store.count_following(user_id).await.map_err(|e| {
            error!(user_id = %user_id, error = %e, "Following count failed");
            FollowError::InternalFailure(e)
        })
    }

    pub async fn count_followers(&self, user_id: Uuid) -> Result<i64, FollowError> {
        self.store.count_followers(user_id).await.map_err(|e| {
            error!(user_id = %user_id, error = %e, "Follower count failed");
            FollowError::InternalFailure(e)
        })
    }

    /// Both counts, recomputed from the store on every call.
    pub async fn counts(&self, user_id: Uuid) -> Result<FollowCounts, FollowError> {
        Ok(FollowCounts {
            following: self.count_following(user_id).await?,
            followers: self.count_followers(user_id).await?,
        })
    }
}
