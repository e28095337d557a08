//! Session resolution middleware
//!
//! Resolves the current user from an access token issued by the auth provider.
//! The token is taken from the `Authorization: Bearer` header or, when absent,
//! from the session cookie the browser client carries.
//!
//! Unlike a guard, this middleware never rejects a request: an absent, expired or
//! otherwise invalid token simply produces an anonymous [`Session`]. Handlers
//! decide what an anonymous caller is allowed to do.
//!
//! ## Example
//! ```rust,ignore
//! use actix_middleware::{SessionMiddleware, SessionVerifier};
//! use actix_web::App;
//!
//! let verifier = SessionVerifier::new("secret", "authenticated");
//! let app = App::new().wrap(SessionMiddleware::new(verifier, "sb-access-token"));
//! ```

use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Access token claims issued by the auth provider
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Audience, `authenticated` for signed-in users
    #[serde(default)]
    pub aud: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid user ID in token: {0}")]
    MalformedSubject(String),

    #[error("No authenticated session")]
    Anonymous,
}

/// Validates HS256 access tokens and extracts the user id.
#[derive(Clone)]
pub struct SessionVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Uuid, SessionError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Uuid::parse_str(&token_data.claims.sub)
            .map_err(|_| SessionError::MalformedSubject(token_data.claims.sub))
    }
}

/// The caller's session. `user_id` is `None` for anonymous callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<Uuid>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    pub fn authenticated(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    /// The user id, or [`SessionError::Anonymous`] for callers without a session.
    pub fn require(&self) -> Result<Uuid, SessionError> {
        self.user_id.ok_or(SessionError::Anonymous)
    }
}

impl FromRequest for Session {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let session = req
            .extensions()
            .get::<Session>()
            .copied()
            .unwrap_or_default();
        ready(Ok(session))
    }
}

/// Session middleware factory
#[derive(Clone)]
pub struct SessionMiddleware {
    verifier: Arc<SessionVerifier>,
    cookie_name: Arc<str>,
}

impl SessionMiddleware {
    pub fn new(verifier: SessionVerifier, cookie_name: &str) -> Self {
        Self {
            verifier: Arc::new(verifier),
            cookie_name: Arc::from(cookie_name),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddlewareService {
            service: Rc::new(service),
            verifier: self.verifier.clone(),
            cookie_name: self.cookie_name.clone(),
        }))
    }
}

pub struct SessionMiddlewareService<S> {
    service: Rc<S>,
    verifier: Arc<SessionVerifier>,
    cookie_name: Arc<str>,
}

impl<S> SessionMiddlewareService<S> {
    /// Bearer header first, then the session cookie.
    fn extract_token(&self, req: &ServiceRequest) -> Option<String> {
        let bearer = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        bearer.or_else(|| {
            req.cookie(&self.cookie_name)
                .map(|c| c.value().to_string())
                .filter(|t| !t.is_empty())
        })
    }
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Owned token: header and cookie borrows must be released before extensions_mut()
        let session = match self.extract_token(&req) {
            Some(token) => match self.verifier.verify(&token) {
                Ok(user_id) => Session::authenticated(user_id),
                Err(e) => {
                    tracing::debug!(error = %e, "Ignoring invalid session token");
                    Session::anonymous()
                }
            },
            None => Session::anonymous(),
        };

        req.extensions_mut().insert(session);

        let service = self.service.clone();
        Box::pin(async move { service.call(req).await })
    }
}
