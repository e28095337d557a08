//! Follow API endpoints
//!
//! POST   /api/users/{user_id}/follow        - Follow a user
//! DELETE /api/users/{user_id}/unfollow      - Unfollow a user
//! GET    /api/users/{user_id}/follow_status - Whether the caller follows a user
//! GET    /api/users/{user_id}/follow_counts - Following / follower counts

use actix_web::{web, HttpResponse};
use actix_middleware::Session;
use serde::Serialize;
use tracing::info;

use super::{parse_id, MessageResponse};
use crate::app_state::AppState;
use crate::error::Result;
use crate::services::FollowOutcome;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowStatusResponse {
    pub is_following: bool,
}

/// POST /api/users/{user_id}/follow
///
/// 201 when created, 409 when the caller already follows the user.
pub async fn follow_user(
    path: web::Path<String>,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse> {
    let follower_id = session.require()?;
    let target_id = parse_id(&path.into_inner(), "user id")?;

    info!(
        follower_id = %follower_id,
        following_id = %target_id,
        "POST /api/users/{{user_id}}/follow"
    );

    let response = match state.follows.create(Some(follower_id), target_id).await? {
        FollowOutcome::Created => HttpResponse::Created().json(MessageResponse {
            message: "Followed successfully",
        }),
        FollowOutcome::AlreadyExists => HttpResponse::Conflict().json(MessageResponse {
            message: "Already following",
        }),
    };

    Ok(response)
}

/// DELETE /api/users/{user_id}/unfollow
pub async fn unfollow_user(
    path: web::Path<String>,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse> {
    let follower_id = session.require()?;
    let target_id = parse_id(&path.into_inner(), "user id")?;

    info!(
        follower_id = %follower_id,
        following_id = %target_id,
        "DELETE /api/users/{{user_id}}/unfollow"
    );

    state.follows.remove(Some(follower_id), target_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/users/{user_id}/follow_status
///
/// Anonymous callers get `false` whatever the path holds, never 401 or 400.
pub async fn follow_status(
    path: web::Path<String>,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse> {
    let Some(follower_id) = session.user_id() else {
        return Ok(HttpResponse::Ok().json(FollowStatusResponse {
            is_following: false,
        }));
    };
    let target_id = parse_id(&path.into_inner(), "user id")?;

    let is_following = state
        .follows
        .is_following(Some(follower_id), target_id)
        .await?;

    Ok(HttpResponse::Ok().json(FollowStatusResponse { is_following }))
}

/// GET /api/users/{user_id}/follow_counts
pub async fn follow_counts(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let user_id = parse_id(&path.into_inner(), "user id")?;
    let counts = state.follows.counts(user_id).await?;
    Ok(HttpResponse::Ok().json(counts))
}
