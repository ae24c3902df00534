use tracing::info;

use crate::error::HttpError;
use crate::handler::BoxFuture;
use crate::middleware::{Middleware, Next};
use crate::request::Request;
use crate::response::IntoResponse;

/// Answers every request with `503 Service Unavailable` while enabled.
/// Register it at the server level so it also covers unknown paths.
#[derive(Clone, Copy, Debug, Default)]
pub struct Maintenance {
    enabled: bool,
}

impl Maintenance {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Middleware for Maintenance {
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        if self.enabled {
            info!(path = req.path(), "maintenance mode, rejecting request");
            let res = HttpError::ServiceUnavailable("service under maintenance".into()).into_response();
            return Box::pin(async move { res });
        }
        Box::pin(next.run(req))
    }
}
