//! The dispatch boundary.
//!
//! [`App`] owns the server-level middleware and the root [`Router`]. For each
//! request it resolves the route, binds path parameters, and runs one flat
//! chain: server layers, router layers, route layers, handler. Unknown paths
//! still pass through the server layers before the 404 is produced.
//!
//! Nothing escapes this boundary. Typed errors have already been rendered by
//! [`IntoResponse`](crate::IntoResponse); a panic is caught at the link of the chain where it
//! happened, logged, and answered with a generic 500 that the enclosing
//! layers still see.

use bytes::Bytes;
use http_body_util::Full;
use tracing::{debug, warn};

use crate::error::HttpError;
use crate::handler::Rejection;
use crate::middleware::{self, BoxedMiddleware, Middleware};
use crate::request::Request;
use crate::response::Response;
use crate::router::{Lookup, Router};
use crate::status::Status;

/// A routable application: server-level middleware around a root router.
///
/// ```rust
/// use strata::{App, Request, Response, Router};
/// use strata::middleware::{AssignRequestId, trace};
///
/// async fn home(_req: Request) -> Response { Response::html("<h1>home</h1>") }
///
/// let app = App::new(Router::new().get("/", home))
///     .layer(AssignRequestId)
///     .layer(trace);
/// ```
pub struct App {
    layers: Vec<BoxedMiddleware>,
    router: Router,
}

impl App {
    pub fn new(router: Router) -> Self {
        Self { layers: Vec::new(), router }
    }

    /// Adds server-level middleware. Runs for every request, matched or not.
    pub fn layer(mut self, mw: impl Middleware) -> Self {
        self.layers.push(middleware::boxed(mw));
        self
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Routes and runs one request through the full chain.
    pub async fn call(&self, mut req: Request) -> Response {
        let (route_layers, endpoint) = match self.router.resolve(req.method(), req.path()) {
            Lookup::Found(found) => {
                debug!(method = %req.method(), route = %found.pattern, "route matched");
                req.bind(found.params);
                (found.layers, found.handler)
            }
            Lookup::MethodNotAllowed(allowed) => {
                (Vec::new(), Rejection::boxed(HttpError::MethodNotAllowed { allowed }))
            }
            Lookup::NotFound => (Vec::new(), Rejection::boxed(HttpError::NotFound)),
        };

        let layers: Vec<BoxedMiddleware> = self.layers.iter().cloned().chain(route_layers).collect();

        middleware::run(layers, req, endpoint).await
    }

    /// Transport entry point: converts, dispatches, finalizes.
    pub async fn handle(&self, req: http::Request<Bytes>) -> http::Response<Full<Bytes>> {
        let res = match Request::try_from(req) {
            Ok(req) => self.call(req).await,
            Err(e) => {
                warn!(error = %e, "rejecting request");
                Response::error(Status::NotImplemented, &e.to_string())
            }
        };
        res.finalize()
    }
}

impl From<Router> for App {
    fn from(router: Router) -> Self {
        Self::new(router)
    }
}
