//! HTTP/2 client.
//!
//! This module provides the main [`Http2Client`] type for making requests.

use std::sync::Arc;
use std::time::Duration;

use http::{HeaderMap, Method};

use crate::builder::ClientBuilder;
use crate::config::RequestOptions;
use crate::dispatch::Dispatch;
use crate::request::{BaseUrl, PreparedRequest, RequestTarget};
use crate::response::Response;
use crate::transport::SessionConnector;
use crate::ClientError;

/// A minimal HTTP/2 client.
///
/// Every request opens its own session, sends one stream on it and closes
/// the session once the stream settles. Nothing is pooled or retried, and
/// redirects are returned as-is.
///
/// Cloning is cheap; clones share the default headers and TLS setup.
///
/// # Example
///
/// ```ignore
/// use http2_fixture::{Http2Client, RequestOptions};
///
/// let client = Http2Client::builder()
///     .base_url("https://localhost:3000")
///     .build()?;
///
/// let response = client
///     .get_with("/", RequestOptions::new().param("blazeit", true))
///     .await?;
/// assert_eq!(response.url(), "https://localhost:3000/?blazeit=true");
/// ```
#[derive(Clone)]
pub struct Http2Client {
    /// Base URL request paths are resolved against.
    base_url: Option<BaseUrl>,
    /// Headers sent with every request. Read-only once built.
    default_headers: Arc<HeaderMap>,
    /// TLS/TCP connector used to open sessions.
    connector: SessionConnector,
    /// Default request timeout. Zero disables it.
    timeout: Duration,
    /// Bound on opening a session.
    connect_timeout: Option<Duration>,
}

impl std::fmt::Debug for Http2Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Http2Client")
            .field("base_url", &self.base_url())
            .field("default_headers", &self.default_headers)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl Http2Client {
    /// Create a new [`ClientBuilder`].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub(crate) fn new(
        base_url: Option<BaseUrl>,
        default_headers: Arc<HeaderMap>,
        connector: SessionConnector,
        timeout: Duration,
        connect_timeout: Option<Duration>,
    ) -> Self {
        Self {
            base_url,
            default_headers,
            connector,
            timeout,
            connect_timeout,
        }
    }

    /// The base URL, if configured.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_ref().map(BaseUrl::as_str)
    }

    /// Headers sent with every request.
    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// The default request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send a `GET` request.
    pub async fn get(&self, url: &str) -> Result<Response, ClientError> {
        self.request(Method::GET, url, RequestOptions::new()).await
    }

    /// Send a `GET` request with options.
    pub async fn get_with(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<Response, ClientError> {
        self.request(Method::GET, url, options).await
    }

    /// Send a `POST` request.
    pub async fn post(&self, url: &str) -> Result<Response, ClientError> {
        self.request(Method::POST, url, RequestOptions::new()).await
    }

    /// Send a `POST` request with options.
    pub async fn post_with(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<Response, ClientError> {
        self.request(Method::POST, url, options).await
    }

    /// Send a `PUT` request.
    pub async fn put(&self, url: &str) -> Result<Response, ClientError> {
        self.request(Method::PUT, url, RequestOptions::new()).await
    }

    /// Send a `PUT` request with options.
    pub async fn put_with(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<Response, ClientError> {
        self.request(Method::PUT, url, options).await
    }

    /// Send a `PATCH` request.
    pub async fn patch(&self, url: &str) -> Result<Response, ClientError> {
        self.request(Method::PATCH, url, RequestOptions::new()).await
    }

    /// Send a `PATCH` request with options.
    pub async fn patch_with(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<Response, ClientError> {
        self.request(Method::PATCH, url, options).await
    }

    /// Send a `DELETE` request.
    pub async fn delete(&self, url: &str) -> Result<Response, ClientError> {
        self.request(Method::DELETE, url, RequestOptions::new()).await
    }

    /// Send a `DELETE` request with options.
    pub async fn delete_with(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<Response, ClientError> {
        self.request(Method::DELETE, url, options).await
    }

    /// Send a request with any method.
    ///
    /// With a base URL, `url` is the request path, used verbatim. Without
    /// one it must be an absolute `http://` or `https://` URL. Either way the
    /// path must start with `/`; `*` is rejected.
    ///
    /// Resolves with the buffered [`Response`] once the stream ends, or
    /// with the first failure: connection, timeout, transport, or a
    /// non-ok status when [`RequestOptions::fail_on_status_code`] is set.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        options: RequestOptions,
    ) -> Result<Response, ClientError> {
        let target = RequestTarget::resolve(self.base_url.as_ref(), url)?;
        let request = PreparedRequest::build(method, target, &self.default_headers, &options)?;

        Dispatch {
            request,
            connector: self.connector.clone(),
            connect_timeout: self.connect_timeout,
            timeout: options.timeout.unwrap_or(self.timeout),
            fail_on_status_code: options.fail_on_status_code,
        }
        .send()
        .await
    }
}

#[cfg(all(test, any(feature = "tls-ring", feature = "tls-aws-lc")))]
mod tests {
    use super::*;

    fn client() -> Http2Client {
        Http2Client::builder()
            .base_url("http://127.0.0.1:3000")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_invalid_path_fails_before_connecting() {
        let err = client().get("no-slash").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_asterisk_form_is_rejected() {
        let err = client()
            .request(Method::OPTIONS, "*", RequestOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_relative_url_without_base_is_rejected() {
        let client = Http2Client::builder().build().unwrap();
        assert!(client.base_url().is_none());
        let err = client.get("/relative").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }
}
