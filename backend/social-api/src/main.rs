use actix_middleware::{MetricsMiddleware, SessionMiddleware, SessionVerifier};
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use social_api::{routes, AppState, Config};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn ready(pool: web::Data<PgPool>) -> impl Responder {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().body("READY"),
        Err(e) => {
            error!(error = %e, "Readiness check failed");
            HttpResponse::ServiceUnavailable().body("NOT READY")
        }
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(config.app.json_logs);
    debug!(
        config = %serde_json::to_string(&config).unwrap_or_default(),
        "Configuration loaded"
    );

    info!(
        env = %config.app.env,
        port = config.app.port,
        "Starting social-api"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    sqlx::query("SELECT 1")
        .execute(&pg_pool)
        .await
        .context("Failed to verify database connection")?;
    info!("Database pool created and verified");

    if config.database.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pg_pool)
            .await
            .context("Failed to run database migrations")?;
        info!("Database migrations completed");
    }

    let state = web::Data::new(AppState::from_pool(pg_pool.clone()));
    let pool_data = web::Data::new(pg_pool);
    let verifier = SessionVerifier::new(&config.auth.jwt_secret, &config.auth.jwt_audience);
    let session_cookie = config.auth.session_cookie.clone();

    let http_addr = format!("{}:{}", config.app.host, config.app.port);
    info!("HTTP API listening on http://{}", http_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(SessionMiddleware::new(verifier.clone(), &session_cookie))
            .wrap(MetricsMiddleware)
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .app_data(pool_data.clone())
            .route("/health", web::get().to(|| async { "OK" }))
            .route("/ready", web::get().to(ready))
            .configure(routes::configure_routes)
    })
    .bind(&http_addr)
    .context("Failed to bind HTTP server")?
    .run()
    .await
    .context("HTTP server error")?;

    info!("social-api shut down");
    Ok(())
}
