//! Static header checks.
//!
//! Two flavours, matching the two failure statuses a client can get:
//! [`RequireHeader`] answers "who are you?" with 401 when a credential header
//! is missing or blank, [`RequireSecret`] answers "you may not" with 403 when
//! a header does not carry the expected value.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::HttpError;
use crate::handler::BoxFuture;
use crate::middleware::{Middleware, Next};
use crate::request::Request;
use crate::response::IntoResponse;

/// Rejects with `401 Unauthorized` unless `name` is present and non-blank.
///
/// ```rust
/// use strata::Router;
/// use strata::middleware::RequireHeader;
///
/// let api = Router::new().layer(RequireHeader::new("x-api-key").message("API key required"));
/// ```
#[derive(Clone, Debug)]
pub struct RequireHeader {
    name: Arc<str>,
    message: Arc<str>,
}

impl RequireHeader {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            message: Arc::from(format!("missing {name} header")),
        }
    }

    /// Error message sent in the 401 body.
    pub fn message(mut self, message: &str) -> Self {
        self.message = Arc::from(message);
        self
    }
}

impl Middleware for RequireHeader {
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        let present = req.header(&self.name).is_some_and(|v| !v.trim().is_empty());
        if !present {
            warn!(header = %self.name, path = req.path(), "credential header missing");
            let res = HttpError::Unauthorized(self.message.to_string()).into_response();
            return Box::pin(async move { res });
        }
        debug!(header = %self.name, "credential header present");
        Box::pin(next.run(req))
    }
}

/// Rejects with `403 Forbidden` unless `name` equals `secret` exactly.
///
/// ```rust
/// use strata::middleware::RequireSecret;
///
/// let admin = RequireSecret::new("x-admin-key", "supersecret").message("Admin access required");
/// ```
#[derive(Clone)]
pub struct RequireSecret {
    name: Arc<str>,
    secret: Arc<str>,
    message: Arc<str>,
}

impl RequireSecret {
    pub fn new(name: &str, secret: &str) -> Self {
        Self {
            name: Arc::from(name),
            secret: Arc::from(secret),
            message: Arc::from("forbidden"),
        }
    }

    /// Error message sent in the 403 body.
    pub fn message(mut self, message: &str) -> Self {
        self.message = Arc::from(message);
        self
    }
}

// Keeps the secret out of logs.
impl std::fmt::Debug for RequireSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequireSecret")
            .field("name", &self.name)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl Middleware for RequireSecret {
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        if req.header(&self.name) != Some(&*self.secret) {
            warn!(header = %self.name, path = req.path(), "secret header mismatch");
            let res = HttpError::Forbidden(self.message.to_string()).into_response();
            return Box::pin(async move { res });
        }
        Box::pin(next.run(req))
    }
}
