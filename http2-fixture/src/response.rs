//! Buffered responses.
//!
//! A [`Response`] holds everything the stream delivered: status, headers
//! and the body chunks in arrival order. The chunks are joined lazily, the
//! first time the body is read.
//!
//! Responses can be released early with [`Response::dispose`], or for the
//! length of a scope with [`Response::scoped`]. A disposed response keeps
//! its status and headers but reports an empty body.

mod report;

use std::ops::{Deref, DerefMut};
use std::sync::OnceLock;

use bytes::{Bytes, BytesMut};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use crate::ClientError;
use http2_fixture_core::{is_ok_status, status_text};

pub(crate) use report::ErrorReporter;
pub use report::{MAX_REPORTED_BODY_CHARS, truncate_body_text};

/// One response header as a name/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    /// Lower-cased header name.
    pub name: String,
    /// Header value; repeated headers are joined with `", "`.
    pub value: String,
}

/// A completed HTTP/2 response.
#[derive(Debug)]
pub struct Response {
    status: u16,
    headers: IndexMap<String, String>,
    chunks: Vec<Bytes>,
    joined: OnceLock<Bytes>,
    url: String,
    disposed: bool,
}

impl Response {
    pub(crate) fn new(
        status: u16,
        headers: IndexMap<String, String>,
        chunks: Vec<Bytes>,
        url: String,
    ) -> Self {
        Self {
            status,
            headers,
            chunks,
            joined: OnceLock::new(),
            url,
            disposed: false,
        }
    }

    /// The status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The reason phrase for the status code, or `"Unknown Status"`.
    pub fn status_text(&self) -> &'static str {
        status_text(self.status)
    }

    /// Returns true if the status is in `200..=399`.
    pub fn ok(&self) -> bool {
        is_ok_status(self.status)
    }

    /// Response headers keyed by lower-cased name, in arrival order.
    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    /// Look up one header, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name.to_ascii_lowercase().as_str())
            .map(String::as_str)
    }

    /// The headers as an ordered list of name/value pairs.
    pub fn headers_array(&self) -> Vec<HeaderEntry> {
        self.headers
            .iter()
            .map(|(name, value)| HeaderEntry {
                name: name.clone(),
                value: value.clone(),
            })
            .collect()
    }

    /// The raw body. Empty once disposed.
    pub fn body(&self) -> Bytes {
        if self.disposed {
            return Bytes::new();
        }
        self.joined
            .get_or_init(|| match self.chunks.as_slice() {
                [] => Bytes::new(),
                [only] => only.clone(),
                chunks => {
                    let mut buf = BytesMut::with_capacity(chunks.iter().map(Bytes::len).sum());
                    for chunk in chunks {
                        buf.extend_from_slice(chunk);
                    }
                    buf.freeze()
                }
            })
            .clone()
    }

    /// The body decoded as UTF-8. Invalid sequences become U+FFFD.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body()).into_owned()
    }

    /// Parse the body as JSON.
    ///
    /// Returns `Ok(None)` once the response is disposed. A parse failure
    /// leaves the response untouched.
    pub fn json<T: DeserializeOwned>(&self) -> Result<Option<T>, ClientError> {
        if self.disposed {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&self.body())?))
    }

    /// The URL the request was sent to: `authority + path + query`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns true if the body has been released.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Release the buffered body. Calling it again does nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.chunks = Vec::new();
        self.joined = OnceLock::new();

        #[cfg(feature = "tracing")]
        tracing::trace!(url = %self.url, "response disposed");
    }

    /// Borrow the response for a scope; it is disposed when the guard drops.
    ///
    /// ```ignore
    /// let mut response = client.get("/").await?;
    /// {
    ///     let scoped = response.scoped();
    ///     let value: Option<serde_json::Value> = scoped.json()?;
    /// }
    /// assert!(response.is_disposed());
    /// ```
    pub fn scoped(&mut self) -> ScopedResponse<'_> {
        ScopedResponse { response: self }
    }
}

/// A response borrowed for a scope. See [`Response::scoped`].
#[derive(Debug)]
pub struct ScopedResponse<'a> {
    response: &'a mut Response,
}

impl Deref for ScopedResponse<'_> {
    type Target = Response;

    fn deref(&self) -> &Self::Target {
        self.response
    }
}

impl DerefMut for ScopedResponse<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.response
    }
}

impl Drop for ScopedResponse<'_> {
    fn drop(&mut self) {
        self.response.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn response(status: u16, chunks: &[&'static str]) -> Response {
        let mut headers = IndexMap::new();
        headers.insert("content-type".to_owned(), "application/json".to_owned());
        headers.insert("x-trace".to_owned(), "a, b".to_owned());
        Response::new(
            status,
            headers,
            chunks.iter().map(|c| Bytes::from_static(c.as_bytes())).collect(),
            "https://localhost:3000/".to_owned(),
        )
    }

    #[test]
    fn test_body_joins_chunks_in_order() {
        let response = response(200, &[r#"{"str":"it is","#, r#""num":42,"#, r#""bool":true}"#]);
        assert_eq!(
            response.body(),
            Bytes::from_static(br#"{"str":"it is","num":42,"bool":true}"#)
        );
        assert_eq!(response.text(), r#"{"str":"it is","num":42,"bool":true}"#);
        assert_eq!(
            response.json::<Value>().unwrap(),
            Some(json!({"str": "it is", "num": 42, "bool": true}))
        );
    }

    #[test]
    fn test_status_accessors() {
        let response = response(201, &[]);
        assert_eq!(response.status(), 201);
        assert_eq!(response.status_text(), "Created");
        assert!(response.ok());
        assert!(response.body().is_empty());

        let response = self::response(569, &[]);
        assert_eq!(response.status_text(), "Unknown Status");
        assert!(!response.ok());
    }

    #[test]
    fn test_headers_accessors() {
        let response = response(200, &[]);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("missing"), None);
        assert_eq!(
            response.headers_array(),
            vec![
                HeaderEntry {
                    name: "content-type".into(),
                    value: "application/json".into()
                },
                HeaderEntry {
                    name: "x-trace".into(),
                    value: "a, b".into()
                },
            ]
        );
    }

    #[test]
    fn test_parse_error_keeps_response_usable() {
        let response = response(200, &["not json"]);
        assert!(matches!(
            response.json::<Value>(),
            Err(ClientError::Parse(_))
        ));
        assert_eq!(response.text(), "not json");
        assert_eq!(response.status(), 200);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut response = response(200, &["hello"]);
        assert_eq!(response.body().len(), 5);

        response.dispose();
        assert!(response.is_disposed());
        assert_eq!(response.body().len(), 0);
        assert_eq!(response.text(), "");
        assert_eq!(response.json::<Value>().unwrap(), None);

        response.dispose();
        assert!(response.is_disposed());
        assert_eq!(response.body().len(), 0);
        assert_eq!(response.status(), 200);
        assert_eq!(response.header("x-trace"), Some("a, b"));
    }

    #[test]
    fn test_scoped_disposes_on_drop() {
        let mut response = response(200, &["hello"]);
        {
            let scoped = response.scoped();
            assert_eq!(scoped.text(), "hello");
        }
        assert!(response.is_disposed());
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_scoped_after_explicit_dispose() {
        let mut response = response(200, &["hello"]);
        {
            let mut scoped = response.scoped();
            scoped.dispose();
            assert!(scoped.is_disposed());
        }
        assert!(response.is_disposed());
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let response = Response::new(
            200,
            IndexMap::new(),
            vec![Bytes::from_static(&[b'o', b'k', 0xff])],
            String::new(),
        );
        assert_eq!(response.text(), "ok\u{fffd}");
    }
}
