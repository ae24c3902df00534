//! Request ids.
//!
//! Reuses the client's `x-request-id` when it sent a usable one, otherwise
//! mints a UUID v4. The id is stored in the request extensions for handlers
//! and echoed on the response.

use tracing::Instrument;
use uuid::Uuid;

use crate::handler::BoxFuture;
use crate::middleware::{Middleware, Next};
use crate::request::Request;

pub const X_REQUEST_ID: &str = "x-request-id";

/// The id assigned to the current request, readable from
/// `req.extensions().get::<RequestId>()`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestId(pub String);

/// Middleware that assigns a [`RequestId`] to every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct AssignRequestId;

impl Middleware for AssignRequestId {
    fn call(&self, mut req: Request, next: Next) -> BoxFuture {
        let id = req
            .header(X_REQUEST_ID)
            .filter(|v| !v.is_empty() && v.len() <= 128)
            .map(str::to_owned)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        req.extensions_mut().insert(RequestId(id.clone()));
        let span = tracing::debug_span!("request_id", %id);

        Box::pin(
            async move {
                let res = next.run(req).await;
                res.with_header(X_REQUEST_ID, &id)
            }
            .instrument(span),
        )
    }
}
