//! The users API: a small application exercising every middleware level.
//!
//! ```text
//! App      AssignRequestId → trace → Maintenance
//! ├── /              home (HTML)
//! ├── /about         about (HTML)
//! ├── /healthz       liveness
//! ├── /readyz        readiness
//! └── /api           RequireHeader(X-API-Key)
//!     ├── GET    /health
//!     ├── GET    /users
//!     ├── POST   /users
//!     ├── GET    /users/{id}
//!     ├── PUT    /users/{id}
//!     ├── DELETE /users/{id}   RequireSecret(X-Admin-Key)
//!     └── GET    /admin        RequireSecret(X-Admin-Key)
//! ```

mod handlers;
pub mod models;

use std::sync::Arc;

use crate::app::App;
use crate::config::Settings;
use crate::health;
use crate::method::Method;
use crate::middleware::{AssignRequestId, Maintenance, RequireHeader, RequireSecret, trace};
use crate::request::Request;
use crate::router::{Route, Router};

/// Builds the whole application from validated settings.
pub fn app(settings: &Settings) -> App {
    let root = Router::new()
        .get("/", handlers::home)
        .get("/about", handlers::about)
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness)
        .mount("/api", api(settings));

    App::new(root)
        .layer(AssignRequestId)
        .layer(trace)
        .layer(Maintenance::new(settings.maintenance))
}

/// The `/api` router, unmounted. Every route requires the API key header;
/// deletion and the admin panel also require the admin secret.
pub fn api(settings: &Settings) -> Router {
    let auth = &settings.auth;
    let admin = RequireSecret::new(&auth.admin_key_header, &auth.admin_key)
        .message("Admin access required");
    let defaults = Arc::new(settings.users.clone());

    Router::new()
        .layer(RequireHeader::new(&auth.api_key_header).message("API key required"))
        .get("/health", health::status)
        .get("/users", move |req: Request| handlers::list_users(req, Arc::clone(&defaults)))
        .post("/users", handlers::create_user)
        .get("/users/{id}", handlers::get_user)
        .put("/users/{id}", handlers::update_user)
        .route(Route::new(Method::Delete, "/users/{id}", handlers::delete_user).layer(admin.clone()))
        .route(Route::new(Method::Get, "/admin", handlers::admin_dashboard).layer(admin))
}
