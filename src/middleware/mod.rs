//! Middleware layer.
//!
//! A middleware sees the request before the handler does and the response
//! after. It is a function of the request and a [`Next`] continuation:
//!
//! ```rust
//! use strata::middleware::Next;
//! use strata::{Request, Response, Status};
//!
//! async fn deny_on_weekends(req: Request, next: Next) -> Response {
//!     if req.header("x-weekend").is_some() {
//!         return Response::error(Status::ServiceUnavailable, "closed");
//!     }
//!     next.run(req).await
//! }
//! ```
//!
//! Layers are registered at three levels and run in one flat chain, outermost
//! first:
//!
//! ```text
//! App::layer      (server level: every request, including 404s)
//!   Router::layer (router level: root router first, then each mounted child)
//!     Route::layer (route level)
//!       handler
//! ```
//!
//! Awaiting `next.run(req)` continues; returning without calling it
//! short-circuits, and nothing deeper in the chain runs.
//!
//! Built-in middleware:
//! - [`trace`] per-request span with method, path, status, latency
//! - [`AssignRequestId`] assigns or propagates `x-request-id`
//! - [`RequireHeader`] 401 unless a header is present and non-empty
//! - [`RequireSecret`] 403 unless a header equals a configured secret
//! - [`Maintenance`] 503 for everything while switched on

mod guard;
mod maintenance;
mod request_id;
mod trace;

pub use guard::{RequireHeader, RequireSecret};
pub use maintenance::Maintenance;
pub use request_id::{AssignRequestId, RequestId, X_REQUEST_ID};
pub use trace::trace;

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;

use crate::error::HttpError;
use crate::handler::{BoxFuture, BoxedEndpoint};
use crate::request::{Phase, Request};
use crate::response::{IntoResponse, Response};

/// An interceptor in the request chain.
///
/// Implemented automatically for any `Fn(Request, Next) -> impl Future`
/// whose output is [`IntoResponse`]. Implement it by hand for middleware
/// that carries configuration.
pub trait Middleware: Send + Sync + 'static {
    fn call(&self, req: Request, next: Next) -> BoxFuture;
}

impl<F, Fut, R> Middleware for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        let fut = self(req, next);
        Box::pin(async move { fut.await.into_response() })
    }
}

/// A shared, type-erased middleware.
pub type BoxedMiddleware = Arc<dyn Middleware>;

pub(crate) fn boxed(mw: impl Middleware) -> BoxedMiddleware {
    Arc::new(mw)
}

/// The rest of the chain after the current middleware.
pub struct Next {
    layers: Arc<[BoxedMiddleware]>,
    index: usize,
    endpoint: BoxedEndpoint,
}

impl Next {
    /// Passes the request to the next layer, or to the handler once every
    /// layer has run.
    ///
    /// A panic in that step becomes a generic 500 right here, so every layer
    /// outside it still sees and can decorate the response.
    pub async fn run(self, mut req: Request) -> Response {
        let step = async move {
            match self.layers.get(self.index).cloned() {
                Some(layer) => {
                    req.enter(Phase::Middleware);
                    let next = Next { index: self.index + 1, ..self };
                    layer.call(req, next).await
                }
                None => {
                    req.enter(Phase::Handler);
                    self.endpoint.call(req).await
                }
            }
        };

        match AssertUnwindSafe(step).catch_unwind().await {
            Ok(res) => res,
            Err(panic) => HttpError::Internal(format!("panic in request chain: {}", panic_message(&*panic)))
                .into_response(),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Runs `req` through `layers` in order, ending at `endpoint`.
pub async fn run(layers: impl Into<Arc<[BoxedMiddleware]>>, req: Request, endpoint: BoxedEndpoint) -> Response {
    Next { layers: layers.into(), index: 0, endpoint }.run(req).await
}
