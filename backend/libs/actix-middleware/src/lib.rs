//! # Actix Middleware Library
//!
//! Shared middleware components for the social-feed Actix services
//!
//! ## Modules
//! - `session`: session resolution from bearer tokens or the auth cookie
//! - `metrics`: Prometheus metrics middleware

pub mod metrics;
pub mod session;

pub use metrics::MetricsMiddleware;
pub use session::{Claims, Session, SessionError, SessionMiddleware, SessionVerifier};
