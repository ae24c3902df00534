//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! A [`Response`] stays mutable while it travels back out through the
//! middleware chain, so outer layers can stamp headers on it. It is finalized
//! exactly once, when the server hands it to hyper; finalization consumes the
//! value, so nothing can touch it afterwards.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;
use tracing::{error, warn};

use crate::codec;
use crate::status::Status;

// ── ContentType ───────────────────────────────────────────────────────────────

/// Common content-type values for use with [`ResponseBuilder::content_type`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContentType {
    Csv,          // text/csv
    FormData,     // application/x-www-form-urlencoded
    Html,         // text/html; charset=utf-8
    Json,         // application/json
    OctetStream,  // application/octet-stream
    Text,         // text/plain; charset=utf-8
    Xml,          // application/xml
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv         => "text/csv",
            Self::FormData    => "application/x-www-form-urlencoded",
            Self::Html        => "text/html; charset=utf-8",
            Self::Json        => "application/json",
            Self::OctetStream => "application/octet-stream",
            Self::Text        => "text/plain; charset=utf-8",
            Self::Xml         => "application/xml",
        }
    }
}

impl AsRef<str> for ContentType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// # Shortcuts (200 OK)
///
/// ```rust
/// use strata::{Response, Status};
///
/// Response::json(&serde_json::json!({ "id": 1 }));
/// Response::html("<h1>hi</h1>");
/// Response::text("hello");
/// Response::status(Status::NoContent);
/// Response::error(Status::Forbidden, "Admin access required");
/// ```
///
/// # Builder (custom status or headers)
///
/// ```rust
/// use strata::{ContentType, Response, Status};
///
/// Response::builder()
///     .status(Status::Created)
///     .header("location", "/api/users/42")
///     .json(&serde_json::json!({ "id": 42, "status": "created" }));
///
/// Response::builder()
///     .content_type(ContentType::Xml)
///     .bytes(b"<ok/>".to_vec());
/// ```
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    content_type: Option<String>,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl Response {
    /// `200 OK` with a JSON body encoded by the codec. Falls back to a bare
    /// `500` if the value cannot be serialised.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        Self::builder().json(value)
    }

    /// `200 OK`, `text/html; charset=utf-8`.
    pub fn html(body: impl Into<String>) -> Self {
        Self::builder().html(body)
    }

    /// `200 OK`, `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::builder().text(body)
    }

    /// Response with no body.
    pub fn status(code: Status) -> Self {
        Self::builder().status(code).no_body()
    }

    /// `{"error": message}` with the given status.
    pub fn error(code: Status, message: &str) -> Self {
        Self::builder()
            .status(code)
            .json(&ErrorBody { error: message })
    }

    pub fn builder() -> ResponseBuilder {
        ResponseBuilder {
            status: StatusCode::OK,
            content_type: None,
            headers: Vec::new(),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Case-insensitive lookup of the first header named `name`.
    /// `content-type` is answered from the body's content type.
    pub fn header(&self, name: &str) -> Option<&str> {
        if name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()) {
            return self.content_type();
        }
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Extra headers in insertion order (content-type excluded).
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Appends a header. Used by middleware post-processing a response on
    /// its way out.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Converts into the transport type. Consumes `self`: a response is
    /// finalized exactly once.
    pub(crate) fn finalize(self) -> http::Response<Full<Bytes>> {
        let mut out = http::Response::new(Full::new(Bytes::new()));
        *out.status_mut() = self.status;

        let headers = out.headers_mut();
        let bodyless = Status::forbids_body(self.status);

        if !bodyless {
            if let Some(ct) = &self.content_type {
                match HeaderValue::from_str(ct) {
                    Ok(v) => { headers.insert(CONTENT_TYPE, v); }
                    Err(_) => warn!(content_type = %ct, "dropping invalid content-type"),
                }
            }
        }

        for (name, value) in &self.headers {
            match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
                (Ok(n), Ok(v)) => { headers.append(n, v); }
                _ => warn!(header = %name, "dropping invalid response header"),
            }
        }

        if !bodyless {
            *out.body_mut() = Full::new(self.body);
        }
        out
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `200 OK`. Terminated by a
/// typed body method, so you always know what you're sending.
#[derive(Debug)]
pub struct ResponseBuilder {
    status: StatusCode,
    content_type: Option<String>,
    headers: Vec<(String, String)>,
}

impl ResponseBuilder {
    pub fn status(mut self, code: Status) -> Self {
        self.status = code.into();
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        if name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()) {
            self.content_type = Some(value.to_owned());
        } else {
            self.headers.push((name.to_owned(), value.to_owned()));
        }
        self
    }

    /// Content type for a later [`bytes`](Self::bytes) body.
    pub fn content_type(mut self, mime: impl AsRef<str>) -> Self {
        self.content_type = Some(mime.as_ref().to_owned());
        self
    }

    /// Terminate with a JSON body (`application/json`).
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Response {
        match codec::encode(value) {
            Ok(body) => self.finish(Some(ContentType::Json.as_str()), body),
            Err(e) => {
                error!(error = %e, "response body could not be encoded");
                Response {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    content_type: None,
                    headers: Vec::new(),
                    body: Bytes::new(),
                }
            }
        }
    }

    /// Terminate with an HTML body (`text/html; charset=utf-8`).
    pub fn html(self, body: impl Into<String>) -> Response {
        self.finish(Some(ContentType::Html.as_str()), body.into().into_bytes())
    }

    /// Terminate with a plain-text body (`text/plain; charset=utf-8`).
    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish(Some(ContentType::Text.as_str()), body.into().into_bytes())
    }

    /// Terminate with raw bytes, labelled with the content type set earlier
    /// or `application/octet-stream`.
    pub fn bytes(self, body: impl Into<Bytes>) -> Response {
        let content_type = self
            .content_type
            .unwrap_or_else(|| ContentType::OctetStream.as_str().to_owned());
        Response {
            status: self.status,
            content_type: Some(content_type),
            headers: self.headers,
            body: body.into(),
        }
    }

    /// Terminate with no body (e.g. `Status::NoContent`).
    pub fn no_body(self) -> Response {
        Response { status: self.status, content_type: None, headers: self.headers, body: Bytes::new() }
    }

    fn finish(self, content_type: Option<&str>, body: Vec<u8>) -> Response {
        Response {
            status: self.status,
            content_type: content_type.map(str::to_owned),
            headers: self.headers,
            body: Bytes::from(body),
        }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implement on your own types to return them directly from handlers and
/// middleware.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

/// Return a [`Status`] directly from a handler: `return Status::NoContent`
impl IntoResponse for Status {
    fn into_response(self) -> Response { Response::status(self) }
}

/// `Ok` and `Err` both render; handlers can use `?` on [`HttpError`](crate::HttpError).
impl<T, E> IntoResponse for Result<T, E>
where
    T: IntoResponse,
    E: IntoResponse,
{
    fn into_response(self) -> Response {
        match self {
            Ok(v) => v.into_response(),
            Err(e) => e.into_response(),
        }
    }
}
