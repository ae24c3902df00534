//! Incoming HTTP request type.
//!
//! A [`Request`] is the per-request context: it is created from the wire,
//! gets its path parameters bound once by the router, then travels by value
//! through the middleware chain into the handler. Middleware attach derived
//! values through [`Request::extensions_mut`].

use std::collections::HashMap;
use std::str::FromStr;

use bytes::Bytes;
use http::{Extensions, HeaderMap};
use serde::de::DeserializeOwned;

use crate::codec::{self, DecodeError};
use crate::method::{Method, UnknownMethod};
use crate::query::Query;

/// Where a request is in its lifecycle.
///
/// `Created → Routed → Middleware → Handler`. Finalizing the response ends
/// the lifecycle; a short-circuiting middleware skips `Handler`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    Created,
    Routed,
    Middleware,
    Handler,
}

/// An incoming HTTP request.
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    query: Query,
    headers: HeaderMap,
    body: Bytes,
    params: HashMap<String, String>,
    extensions: Extensions,
    phase: Phase,
}

impl Request {
    pub(crate) fn new(method: Method, path: String, query: Query, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            path,
            query,
            headers,
            body,
            params: HashMap::new(),
            extensions: Extensions::new(),
            phase: Phase::Created,
        }
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }
    pub fn query(&self) -> &Query { &self.query }
    pub fn params(&self) -> &HashMap<String, String> { &self.params }
    pub fn phase(&self) -> Phase { self.phase }

    /// Case-insensitive header lookup. Values that are not visible ASCII read
    /// as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// First value of a query parameter parsed as `T`; `default` when absent
    /// or unparsable.
    ///
    /// `?page=5` → `req.query_or("page", 1) == 5`; `?page=x` → `1`.
    pub fn query_or<T: FromStr>(&self, key: &str, default: T) -> T {
        self.query
            .get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Decodes the body as JSON into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, DecodeError> {
        codec::decode(&self.body)
    }

    pub fn extensions(&self) -> &Extensions { &self.extensions }
    pub fn extensions_mut(&mut self) -> &mut Extensions { &mut self.extensions }

    pub(crate) fn bind(&mut self, params: HashMap<String, String>) {
        self.params = params;
        self.phase = Phase::Routed;
    }

    pub(crate) fn enter(&mut self, phase: Phase) {
        self.phase = phase;
    }
}

/// Builds a request from an `http` request whose body has already been
/// collected. Fails only on methods outside the RFC 9110 set.
impl TryFrom<http::Request<Bytes>> for Request {
    type Error = UnknownMethod;

    fn try_from(req: http::Request<Bytes>) -> Result<Self, Self::Error> {
        let (parts, body) = req.into_parts();
        let method = Method::try_from(&parts.method)?;
        let path = parts.uri.path().to_owned();
        let query = parts.uri.query().map(Query::parse).unwrap_or_default();
        Ok(Self::new(method, path, query, parts.headers, body))
    }
}
