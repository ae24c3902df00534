//! Handlers and the endpoints they are erased into.
//!
//! A route table holds handlers of many concrete types, so registration turns
//! each one into an [`Endpoint`] trait object. The same trait closes every
//! middleware chain, whether the chain ends in a user handler or in the
//! 404/405 rejection produced when routing fails.
//!
//! ```text
//! async fn get_user(req: Request) -> Result<Json<User>, HttpError>
//!        ↓ Router::get("/users/{id}", get_user)
//! Arc<FnEndpoint<get_user>>            stored in the route table
//!        ↓ request time
//! Endpoint::call(req) → BoxFuture      output mapped through IntoResponse
//! ```
//!
//! Closures work too, which is how handlers capture configuration:
//!
//! ```rust
//! use std::sync::Arc;
//! use strata::{Request, Response, Router};
//!
//! let greeting: Arc<str> = Arc::from("hello");
//! Router::new().get("/", move |_req: Request| {
//!     let greeting = Arc::clone(&greeting);
//!     async move { Response::text(greeting.to_string()) }
//! });
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::HttpError;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A boxed future resolving to a [`Response`], returned by
/// [`Middleware::call`](crate::middleware::Middleware::call) and by every
/// endpoint.
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// The last link of a middleware chain.
#[doc(hidden)]
pub trait Endpoint: Send + Sync + 'static {
    fn call(&self, req: Request) -> BoxFuture;
}

#[doc(hidden)]
pub type BoxedEndpoint = Arc<dyn Endpoint>;

/// Implemented for every valid route handler:
///
/// ```text
/// Fn(Request) -> impl Future<Output = impl IntoResponse>
/// ```
///
/// Sealed; the blanket impl is the only one.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_endpoint(self) -> BoxedEndpoint;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_endpoint(self) -> BoxedEndpoint {
        Arc::new(FnEndpoint(self))
    }
}

struct FnEndpoint<F>(F);

impl<F, Fut, R> Endpoint for FnEndpoint<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

/// Ends the chain of a request that matched no route.
pub(crate) struct Rejection(pub(crate) HttpError);

impl Rejection {
    pub(crate) fn boxed(err: HttpError) -> BoxedEndpoint {
        Arc::new(Self(err))
    }
}

impl Endpoint for Rejection {
    fn call(&self, _req: Request) -> BoxFuture {
        let res = self.0.clone().into_response();
        Box::pin(async move { res })
    }
}
