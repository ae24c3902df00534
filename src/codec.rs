//! JSON codec boundary.
//!
//! Request bodies come in as raw bytes and are decoded into typed payloads on
//! demand; responses go out as bytes produced from `Serialize` values. The
//! expected shape of a payload is its serde derive: a missing required field
//! or a value of the wrong primitive type is a [`DecodeError`], and so is
//! malformed syntax.
//!
//! ```rust
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct NewUser { id: u32, name: String }
//!
//! let err = strata::decode::<NewUser>(br#"{"invalid":"json"}"#).unwrap_err();
//! assert!(err.to_string().contains("missing field"));
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::response::{IntoResponse, Response};

/// A payload did not match the expected JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DecodeError {
    message: String,
}

impl DecodeError {
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A value could not be serialised. Unreachable for plain derived structs;
/// possible only for maps with non-string keys or failing custom impls.
#[derive(Debug, thiserror::Error)]
#[error("encode: {0}")]
pub struct EncodeError(#[from] serde_json::Error);

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(DecodeError { message: "request body is empty".to_owned() });
    }
    serde_json::from_slice(bytes).map_err(|e| DecodeError { message: e.to_string() })
}

/// Serialises `value` with fields in declaration order.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, EncodeError> {
    Ok(serde_json::to_vec(value)?)
}

/// Typed JSON response body.
///
/// ```rust
/// use strata::{Json, Request};
///
/// #[derive(serde::Serialize)]
/// struct Health { status: &'static str }
///
/// async fn health(_req: Request) -> Json<Health> {
///     Json(Health { status: "healthy" })
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        Response::json(&self.0)
    }
}
