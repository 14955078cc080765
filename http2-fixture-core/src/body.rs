//! Request body payloads.
//!
//! [`RequestBody`] is tagged at construction time, so the content type and
//! wire encoding never depend on inspecting the payload afterwards.

use bytes::Bytes;
use serde::Serialize;

/// Content type used for [`RequestBody::Structured`] payloads.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Content type used for text and binary payloads.
pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// A request payload.
///
/// # Example
///
/// ```
/// use http2_fixture_core::RequestBody;
/// use serde_json::json;
///
/// let body = RequestBody::from(json!({"str": "it is", "num": 42, "bool": true}));
/// assert_eq!(body.default_content_type(), "application/json");
/// assert_eq!(body.encode().unwrap(), r#"{"str":"it is","num":42,"bool":true}"#);
///
/// let body = RequestBody::from("plain");
/// assert_eq!(body.default_content_type(), "application/octet-stream");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Text sent as-is.
    Text(String),
    /// Raw bytes sent as-is.
    Binary(Bytes),
    /// A structured value, JSON-encoded on send.
    Structured(serde_json::Value),
}

impl RequestBody {
    /// Create a structured body from any serializable value.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(RequestBody::Structured)
    }

    /// The content type to send when the caller did not provide one.
    pub fn default_content_type(&self) -> &'static str {
        match self {
            RequestBody::Structured(_) => CONTENT_TYPE_JSON,
            RequestBody::Text(_) | RequestBody::Binary(_) => CONTENT_TYPE_OCTET_STREAM,
        }
    }

    /// Returns true for structured (JSON-encoded) payloads.
    pub fn is_structured(&self) -> bool {
        matches!(self, RequestBody::Structured(_))
    }

    /// Encode the payload into the bytes written to the stream.
    ///
    /// Text and binary payloads pass through unchanged. Only structured
    /// payloads can fail, and only if the value holds a non-string map key.
    pub fn encode(&self) -> Result<Bytes, serde_json::Error> {
        match self {
            RequestBody::Text(text) => Ok(Bytes::copy_from_slice(text.as_bytes())),
            RequestBody::Binary(data) => Ok(data.clone()),
            RequestBody::Structured(value) => serde_json::to_vec(value).map(Bytes::from),
        }
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Text(text.to_owned())
    }
}

impl From<Bytes> for RequestBody {
    fn from(data: Bytes) -> Self {
        RequestBody::Binary(data)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(data: Vec<u8>) -> Self {
        RequestBody::Binary(Bytes::from(data))
    }
}

impl From<&[u8]> for RequestBody {
    fn from(data: &[u8]) -> Self {
        RequestBody::Binary(Bytes::copy_from_slice(data))
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        RequestBody::Structured(value)
    }
}
