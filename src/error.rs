//! Error types.
//!
//! Two families live here. [`HttpError`] is the request-level taxonomy that
//! handlers and middleware return; the dispatch boundary renders each variant
//! as a status code plus a `{"error": "..."}` JSON body. [`Error`] surfaces
//! infrastructure failures: binding a port, registering a malformed route,
//! loading configuration.

use tracing::error;

use crate::codec::DecodeError;
use crate::config::ConfigError;
use crate::method::Method;
use crate::response::{IntoResponse, Response};
use crate::status::Status;

/// The error type returned by strata's fallible setup operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid socket address `{addr}`: {source}")]
    InvalidAddr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("invalid route `{path}`: {reason}")]
    InvalidRoute { path: String, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    pub(crate) fn invalid_route(path: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRoute { path: path.to_owned(), reason: reason.into() }
    }
}

/// A request failure that maps onto an HTTP status.
///
/// Return it from a handler or middleware as `Err(HttpError::...)`:
///
/// ```rust
/// use strata::{HttpError, Request, Response};
///
/// async fn show(req: Request) -> Result<Response, HttpError> {
///     let id: u32 = req
///         .param("id")
///         .and_then(|v| v.parse().ok())
///         .ok_or_else(|| HttpError::BadRequest("invalid user id".into()))?;
///     Ok(Response::text(id.to_string()))
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpError {
    #[error("not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotAllowed { allowed: Vec<Method> },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    /// The message is logged, never sent to the client.
    #[error("{0}")]
    Internal(String),
}

impl HttpError {
    pub fn status(&self) -> Status {
        match self {
            Self::NotFound              => Status::NotFound,
            Self::MethodNotAllowed { .. } => Status::MethodNotAllowed,
            Self::Unauthorized(_)       => Status::Unauthorized,
            Self::Forbidden(_)          => Status::Forbidden,
            Self::BadRequest(_)         => Status::BadRequest,
            Self::ServiceUnavailable(_) => Status::ServiceUnavailable,
            Self::Internal(_)           => Status::InternalServerError,
        }
    }
}

impl From<DecodeError> for HttpError {
    fn from(e: DecodeError) -> Self {
        Self::BadRequest(format!("invalid JSON: {e}"))
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Internal(detail) => {
                error!(%detail, "request failed");
                Response::error(status, "internal server error")
            }
            Self::MethodNotAllowed { allowed } => {
                let allow = allowed
                    .iter()
                    .map(|m| m.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                Response::error(status, "method not allowed").with_header("allow", &allow)
            }
            other => Response::error(status, &other.to_string()),
        }
    }
}
