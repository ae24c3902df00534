//! Health-check handlers.
//!
//! | Handler | Typical path | Question |
//! |---|---|---|
//! | [`liveness`] | `/healthz` | Is the process alive? Failure → restart. |
//! | [`readiness`] | `/readyz` | Can it serve traffic? Failure → pulled from the load balancer. |
//! | [`status`] | `/api/health` | Which build is answering? JSON for authenticated clients. |
//!
//! ```rust
//! use strata::{Router, health};
//!
//! let app = Router::new()
//!     .get("/healthz", health::liveness)
//!     .get("/readyz", health::readiness);
//! ```

use serde::Serialize;

use crate::codec::Json;
use crate::{Request, Response};

/// Always `200 OK` with body `"ok"`. If the process can answer HTTP at all,
/// it is alive.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// `200 OK` with body `"ready"`. Replace with your own handler if readiness
/// depends on warm-up or downstream services.
pub async fn readiness(_req: Request) -> Response {
    Response::text("ready")
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// `{"status":"healthy","version":"<crate version>"}`.
pub async fn status(_req: Request) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}
