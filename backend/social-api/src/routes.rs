//! Route configuration
//!
//! Each domain manages its own routes under `/api`.

use actix_web::{
    error::{JsonPayloadError, QueryPayloadError},
    web, HttpRequest, HttpResponse,
};

use crate::error::AppError;
use crate::handlers::{follows, posts, profiles, replies};

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .route("/metrics", web::get().to(metrics_handler))
        .service(
            web::scope("/api")
                .configure(configure_follow_routes)
                .configure(configure_post_routes)
                .configure(configure_profile_routes),
        );
}

pub fn configure_follow_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/users/{user_id}/follow", web::post().to(follows::follow_user))
        .route(
            "/users/{user_id}/unfollow",
            web::delete().to(follows::unfollow_user),
        )
        .route(
            "/users/{user_id}/follow_status",
            web::get().to(follows::follow_status),
        )
        .route(
            "/users/{user_id}/follow_counts",
            web::get().to(follows::follow_counts),
        );
}

pub fn configure_post_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/posts", web::get().to(posts::list_timeline))
        .route("/posts", web::post().to(posts::create_post))
        .route("/posts/{post_id}", web::get().to(posts::get_post))
        .route(
            "/posts/{post_id}/replies",
            web::get().to(replies::list_replies),
        )
        .route("/posts/{post_id}/reply", web::post().to(replies::create_reply))
        .route("/users/{user_id}/posts", web::get().to(posts::list_user_posts));
}

pub fn configure_profile_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/users/{user_id}/profile", web::get().to(profiles::get_profile))
        .route("/profile", web::put().to(profiles::update_profile));
}

/// JSON extractor errors use the same body shape as every other error.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        tracing::debug!(error = %err, "Rejected JSON body");
        AppError::Validation("Invalid request body".to_string()).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req: &HttpRequest| {
        tracing::debug!(error = %err, "Rejected query string");
        AppError::Validation("Invalid query string".to_string()).into()
    })
}

async fn metrics_handler() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(actix_middleware::metrics::gather_metrics())
}
