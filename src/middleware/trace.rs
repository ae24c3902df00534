use std::time::Instant;

use tracing::{Instrument, info, info_span};

use crate::middleware::Next;
use crate::request::Request;
use crate::response::Response;

/// Per-request span with method and path; logs status and latency when the
/// response comes back. Never short-circuits.
///
/// ```rust
/// use strata::{App, Router};
/// use strata::middleware::trace;
///
/// let app = App::new(Router::new()).layer(trace);
/// ```
pub async fn trace(req: Request, next: Next) -> Response {
    let span = info_span!("request", method = %req.method(), path = %req.path());
    let started = Instant::now();

    async move {
        let res = next.run(req).await;
        info!(
            status = res.status_code(),
            latency_ms = started.elapsed().as_secs_f64() * 1000.0,
            "request completed"
        );
        res
    }
    .instrument(span)
    .await
}
