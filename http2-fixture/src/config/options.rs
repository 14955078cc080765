//! Per-request options.
//!
//! This module provides [`RequestOptions`] for configuring a single request:
//! its body, query parameters, headers, timeout and whether a non-ok status
//! should fail the call.

use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue};
use http2_fixture_core::{QueryParams, QueryValue, RequestBody};
use serde::Serialize;

use crate::ClientError;

/// Options for a single request.
///
/// Anything left unset falls back to the client's defaults.
///
/// # Example
///
/// ```ignore
/// use http2_fixture::RequestOptions;
/// use std::time::Duration;
///
/// let options = RequestOptions::new()
///     .param("blazeit", true)
///     .header("x-request-id", "abc-123")
///     .timeout(Duration::from_secs(5))
///     .fail_on_status_code(true);
///
/// let response = client.get_with("/", options).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub(crate) data: Option<RequestBody>,
    pub(crate) fail_on_status_code: bool,
    pub(crate) headers: HeaderMap,
    pub(crate) params: QueryParams,
    /// `None` uses the client default; `Some(Duration::ZERO)` disables it.
    pub(crate) timeout: Option<Duration>,
}

impl RequestOptions {
    /// Create empty request options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request body.
    ///
    /// Strings are sent as text, byte buffers as binary and
    /// [`serde_json::Value`]s are JSON-encoded.
    pub fn data(mut self, data: impl Into<RequestBody>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set a structured request body from any serializable value.
    ///
    /// The value is sent as JSON with `content-type: application/json`
    /// unless a content type is set on this request.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, ClientError> {
        let body = RequestBody::json(value).map_err(|e| ClientError::Encode(e.to_string()))?;
        self.data = Some(body);
        Ok(self)
    }

    /// Fail the request with [`ClientError::Status`] when the response
    /// status is outside `200..=399`.
    pub fn fail_on_status_code(mut self, fail: bool) -> Self {
        self.fail_on_status_code = fail;
        self
    }

    /// Add a header for this request.
    ///
    /// Repeated calls with the same name send every value. Per-request
    /// headers replace client defaults of the same name.
    ///
    /// # Panics
    ///
    /// Panics if the header name or value is invalid.
    pub fn header<K, V>(mut self, name: K, value: V) -> Self
    where
        K: TryInto<HeaderName>,
        K::Error: std::fmt::Debug,
        V: TryInto<HeaderValue>,
        V::Error: std::fmt::Debug,
    {
        let name = name.try_into().expect("invalid header name");
        let value = value.try_into().expect("invalid header value");
        self.headers.append(name, value);
        self
    }

    /// Try to add a header for this request.
    ///
    /// Returns `None` if the header name or value is invalid.
    pub fn try_header<K, V>(mut self, name: K, value: V) -> Option<Self>
    where
        K: TryInto<HeaderName>,
        V: TryInto<HeaderValue>,
    {
        let name = name.try_into().ok()?;
        let value = value.try_into().ok()?;
        self.headers.append(name, value);
        Some(self)
    }

    /// Set all headers for this request, replacing any added so far.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Get a mutable reference to the request headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Append a query parameter. Order and repeats are preserved.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.params.append(name, value);
        self
    }

    /// Append several query parameters.
    pub fn params<K, V, I>(mut self, params: I) -> Self
    where
        K: Into<String>,
        V: Into<QueryValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.params.extend(params);
        self
    }

    /// Set the timeout for this request.
    ///
    /// `Duration::ZERO` disables the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disable the timeout for this request.
    pub fn no_timeout(self) -> Self {
        self.timeout(Duration::ZERO)
    }

    /// The request body, if any.
    pub fn get_data(&self) -> Option<&RequestBody> {
        self.data.as_ref()
    }

    /// The per-request headers.
    pub fn get_headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The query parameters.
    pub fn get_params(&self) -> &QueryParams {
        &self.params
    }

    /// The configured timeout, if any.
    pub fn get_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Whether a non-ok status fails the request.
    pub fn get_fail_on_status_code(&self) -> bool {
        self.fail_on_status_code
    }
}
