use std::sync::Arc;

use tracing::info;

use super::models::{AdminStats, StatusReply, User, UserDetail, UserPage, TOTAL_USERS, sample_users};
use crate::codec::Json;
use crate::config::UserSettings;
use crate::error::HttpError;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

const HOME: &str = r#"<!doctype html>
<html>
<head><title>strata</title></head>
<body>
<h1>strata</h1>
<ul>
  <li><a href="/">/</a> public, server middleware only</li>
  <li><a href="/about">/about</a> public</li>
  <li><a href="/api/users">/api/users</a> needs X-API-Key</li>
  <li><a href="/api/admin">/api/admin</a> needs X-API-Key and X-Admin-Key</li>
</ul>
</body>
</html>
"#;

const ABOUT: &str = r#"<!doctype html>
<html>
<head><title>About strata</title></head>
<body>
<h1>About</h1>
<p>Routing with path and query parameters, JSON bodies, and middleware at
server, router and route level.</p>
<a href="/">Back</a>
</body>
</html>
"#;

pub async fn home(_req: Request) -> Response {
    Response::html(HOME)
}

pub async fn about(_req: Request) -> Response {
    Response::html(ABOUT)
}

/// `GET /users?page=&limit=&sort=`. Unparseable values fall back to the
/// configured defaults.
pub async fn list_users(req: Request, defaults: Arc<UserSettings>) -> Json<UserPage> {
    let page = req.query_or("page", 1u32);
    let limit = req.query_or("limit", defaults.default_limit);
    let sort = req
        .query()
        .get("sort")
        .unwrap_or(defaults.default_sort.as_str())
        .to_owned();

    Json(UserPage { page, limit, users: sample_users(&sort), sort, total: TOTAL_USERS })
}

pub async fn get_user(req: Request) -> Result<Json<UserDetail>, HttpError> {
    let id = req
        .param("id")
        .ok_or_else(|| HttpError::Internal("route bound without `id`".into()))?;
    let include_posts = req.query_or("include_posts", false);
    let include_comments = req.query_or("include_comments", false);

    Ok(Json(UserDetail::synthesize(id, include_posts, include_comments)))
}

pub async fn create_user(req: Request) -> Result<Response, HttpError> {
    let user: User = req.json()?;
    info!(id = user.id, name = %user.name, "user created");

    let location = format!("/api/users/{}", user.id);
    Ok(Response::builder()
        .status(Status::Created)
        .header("location", &location)
        .json(&StatusReply { id: user.id, status: "created".into() }))
}

/// The path id wins over any `id` in the body.
pub async fn update_user(req: Request) -> Result<Json<User>, HttpError> {
    let id: u32 = req
        .param("id")
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| HttpError::BadRequest("invalid user id".into()))?;
    let user: User = req.json()?;
    info!(id, name = %user.name, "user updated");

    Ok(Json(User { id, ..user }))
}

pub async fn delete_user(req: Request) -> Status {
    info!(id = req.param("id").unwrap_or_default(), "user deleted");
    Status::NoContent
}

pub async fn admin_dashboard(_req: Request) -> Response {
    Response::builder()
        .header("x-admin-panel", "true")
        .json(&AdminStats { total_users: TOTAL_USERS, active_sessions: 42, requests_today: 5432 })
}
