//! # strata
//!
//! A small HTTP framework built around one idea: every request walks a single
//! flat chain of middleware, assembled from three levels.
//!
//! ```text
//! App::layer     server level, every request (404s included)
//! Router::layer  router level, root router first, then mounted children
//! Route::layer   route level
//! handler
//! ```
//!
//! Any layer may answer on its own and stop the walk. Whatever comes back,
//! a typed [`HttpError`] or a panic, is turned into a JSON error response at
//! the [`App`] boundary.
//!
//! What strata gives you:
//!
//! - Radix-tree routing via [`matchit`], `{name}` path parameters, 405 with `Allow`
//! - Prefix routers composed with [`Router::mount`]
//! - A response builder finalized exactly once, at the transport boundary
//! - serde JSON in both directions ([`Json`], [`Request::json`])
//! - hyper 1 transport with graceful shutdown on SIGTERM / Ctrl-C
//!
//! The [`users`] module is a complete application built with it; the
//! `strata` binary serves it.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use strata::middleware::{AssignRequestId, RequireHeader, trace};
//! use strata::{App, HttpError, Request, Response, Router, Server, Status};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), strata::Error> {
//!     let api = Router::new()
//!         .layer(RequireHeader::new("x-api-key"))
//!         .get("/users/{id}", get_user)
//!         .post("/users", create_user);
//!
//!     let app = App::new(Router::new().mount("/api", api))
//!         .layer(AssignRequestId)
//!         .layer(trace);
//!
//!     Server::bind("0.0.0.0:3000")?.serve(app).await
//! }
//!
//! #[derive(serde::Serialize, serde::Deserialize)]
//! struct User { id: u32, name: String }
//!
//! async fn get_user(req: Request) -> Result<Response, HttpError> {
//!     let id: u32 = req
//!         .param("id")
//!         .and_then(|v| v.parse().ok())
//!         .ok_or_else(|| HttpError::BadRequest("invalid user id".into()))?;
//!     Ok(Response::json(&User { id, name: format!("User {id}") }))
//! }
//!
//! async fn create_user(req: Request) -> Result<Response, HttpError> {
//!     let user: User = req.json()?;
//!     Ok(Response::builder()
//!         .status(Status::Created)
//!         .header("location", &format!("/api/users/{}", user.id))
//!         .json(&user))
//! }
//! ```

mod app;
mod codec;
mod error;
mod handler;
mod method;
mod query;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod config;
pub mod health;
pub mod middleware;
pub mod users;

pub use app::App;
pub use codec::{DecodeError, EncodeError, Json, decode, encode};
pub use config::Settings;
pub use error::{Error, HttpError};
pub use handler::{BoxFuture, Handler};
pub use method::{Method, UnknownMethod};
pub use query::Query;
pub use request::{Phase, Request};
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::{Route, Router};
pub use server::Server;
pub use status::Status;
