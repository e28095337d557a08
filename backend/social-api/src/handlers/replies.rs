//! GET  /api/posts/{post_id}/replies - Replies to a post, newest first
//! POST /api/posts/{post_id}/reply   - Reply to a post

use actix_web::{web, HttpResponse};
use actix_middleware::Session;
use tracing::{info, warn};

use super::{extract_content, parse_id, PageQuery};
use crate::app_state::AppState;
use crate::error::{AppError, Result};
use crate::repository::StoreError;

pub async fn list_replies(
    path: web::Path<String>,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let post_id = parse_id(&path.into_inner(), "post id")?;
    let replies = state
        .replies
        .list_for_post(post_id, (&*query).into())
        .await?;
    Ok(HttpResponse::Ok().json(replies))
}

pub async fn create_reply(
    path: web::Path<String>,
    body: web::Bytes,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse> {
    let user_id = session.require()?;
    let post_id = parse_id(&path.into_inner(), "post id")?;
    let content = extract_content(&body)?;

    match state.replies.create_reply(user_id, post_id, &content).await {
        Ok(reply) => {
            info!(user_id = %user_id, post_id = %post_id, reply_id = %reply.id, "Reply created");
            Ok(HttpResponse::Created().json(reply))
        }
        Err(StoreError::ForeignKeyViolation(detail)) => {
            warn!(user_id = %user_id, post_id = %post_id, detail = %detail, "Reply references unknown row");
            Err(AppError::Validation("Invalid post_id or user_id".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
