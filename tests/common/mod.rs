//! Shared helpers for the integration tests.

use bytes::Bytes;
use http_body_util::BodyExt;
use serde_json::Value;
use strata::{App, Settings, users};

pub const API_KEY: (&str, &str) = ("X-API-Key", "test-key");
pub const ADMIN_KEY: (&str, &str) = ("X-Admin-Key", "supersecret");

pub struct Reply {
    pub status: u16,
    pub headers: http::HeaderMap,
    pub body: Bytes,
}

#[allow(dead_code)]
impl Reply {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("body is not JSON ({e}): {:?}", self.body))
    }

    pub fn text(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap()
    }
}

/// The users application with default settings.
pub fn app() -> App {
    users::app(&Settings::default())
}

pub async fn send(app: &App, method: &str, uri: &str, headers: &[(&str, &str)], body: &str) -> Reply {
    let mut req = http::Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        req = req.header(*name, *value);
    }
    let req = req.body(Bytes::copy_from_slice(body.as_bytes())).unwrap();

    let res = app.handle(req).await;
    let status = res.status().as_u16();
    let headers = res.headers().clone();
    let body = res.into_body().collect().await.unwrap().to_bytes();
    Reply { status, headers, body }
}

#[allow(dead_code)]
pub async fn get(app: &App, uri: &str, headers: &[(&str, &str)]) -> Reply {
    send(app, "GET", uri, headers, "").await
}
