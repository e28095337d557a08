//! Post API endpoints
//!
//! GET  /api/posts                  - Timeline, newest first
//! POST /api/posts                  - Create a post
//! GET  /api/posts/{post_id}        - One post
//! GET  /api/users/{user_id}/posts  - One user's posts

use actix_web::{web, HttpResponse};
use actix_middleware::Session;
use tracing::info;

use super::{extract_content, parse_id, PageQuery};
use crate::app_state::AppState;
use crate::error::{AppError, Result};

pub async fn list_timeline(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let posts = state.posts.list_timeline((&*query).into()).await?;
    Ok(HttpResponse::Ok().json(posts))
}

pub async fn list_user_posts(
    path: web::Path<String>,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let user_id = parse_id(&path.into_inner(), "user id")?;
    let posts = state.posts.list_by_user(user_id, (&*query).into()).await?;
    Ok(HttpResponse::Ok().json(posts))
}

pub async fn get_post(path: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let post_id = parse_id(&path.into_inner(), "post id")?;

    match state.posts.get_post(post_id).await? {
        Some(post) => Ok(HttpResponse::Ok().json(post)),
        None => Err(AppError::NotFound("Post not found".to_string())),
    }
}

pub async fn create_post(
    body: web::Bytes,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse> {
    let user_id = session.require()?;
    let content = extract_content(&body)?;

    let post = state.posts.create_post(user_id, &content).await?;
    info!(user_id = %user_id, post_id = %post.id, "Post created");

    Ok(HttpResponse::Created().json(post))
}
