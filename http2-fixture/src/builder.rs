//! Client builder.
//!
//! Provides a fluent API for configuring and building an [`Http2Client`].

use std::sync::Arc;
use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue};

use crate::client::Http2Client;
use crate::config::ClientSettings;
use crate::request::BaseUrl;
use crate::transport::{
    build_https_connector, insecure_tls_config, verified_tls_config, TlsClientConfig,
};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Builder for creating an [`Http2Client`].
///
/// # Example
///
/// ```ignore
/// use http2_fixture::Http2Client;
///
/// let client = Http2Client::builder()
///     .base_url("https://localhost:3000")
///     .extra_http_header("x-api-key", "secret")
///     .ignore_https_errors(true)
///     .build()?;
/// ```
#[derive(Clone)]
pub struct ClientBuilder {
    /// Base URL request paths are resolved against.
    base_url: Option<String>,
    /// Headers sent with every request, validated on build.
    extra_http_headers: Vec<(String, String)>,
    /// Accept any server certificate.
    ignore_https_errors: bool,
    /// Caller-provided TLS configuration.
    tls_config: Option<TlsClientConfig>,
    /// Default request timeout. Zero disables it.
    timeout: Duration,
    /// Bound on opening a session.
    connect_timeout: Option<Duration>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("extra_http_headers", &self.extra_http_headers.len())
            .field("ignore_https_errors", &self.ignore_https_errors)
            .field("tls_config", &self.tls_config.is_some())
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Create a builder with no base URL and the default timeout.
    pub fn new() -> Self {
        Self {
            base_url: None,
            extra_http_headers: Vec::new(),
            ignore_https_errors: false,
            tls_config: None,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: None,
        }
    }

    /// Create a builder from serializable settings.
    ///
    /// ```ignore
    /// let settings = ClientSettings::from_json(r#"{"baseURL": "https://localhost:3000"}"#)?;
    /// let client = ClientBuilder::from_settings(&settings).build()?;
    /// ```
    pub fn from_settings(settings: &ClientSettings) -> Self {
        let mut builder = Self::new()
            .extra_http_headers(settings.extra_http_headers.clone())
            .ignore_https_errors(settings.ignore_https_errors);

        if let Some(base_url) = &settings.base_url {
            builder = builder.base_url(base_url.clone());
        }
        if let Some(timeout) = settings.timeout_duration() {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = settings.connect_timeout_duration() {
            builder = builder.connect_timeout(connect_timeout);
        }
        builder
    }

    /// Set the base URL.
    ///
    /// With a base URL, the string passed to each request is used verbatim
    /// as the request path. A trailing slash is removed.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a header sent with every request.
    ///
    /// Per-request headers of the same name replace it.
    pub fn extra_http_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_http_headers.push((name.into(), value.into()));
        self
    }

    /// Add several headers sent with every request.
    pub fn extra_http_headers<K, V, I>(mut self, headers: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.extra_http_headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Skip server certificate verification.
    ///
    /// Ignored when a TLS configuration is supplied with
    /// [`tls_config`](Self::tls_config).
    pub fn ignore_https_errors(mut self, ignore: bool) -> Self {
        self.ignore_https_errors = ignore;
        self
    }

    /// Use a caller-provided rustls configuration.
    ///
    /// ALPN is set to `h2` by the connector.
    pub fn tls_config(mut self, config: TlsClientConfig) -> Self {
        self.tls_config = Some(config);
        self
    }

    /// Set the default request timeout.
    ///
    /// The deadline covers opening the session and the whole stream.
    /// `Duration::ZERO` disables it. Individual requests can override it
    /// with [`RequestOptions::timeout`](crate::RequestOptions::timeout).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Bound the time spent opening a session.
    ///
    /// Exceeding it fails the request with
    /// [`ClientError::Connection`](crate::ClientError::Connection).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Fails if the base URL or a header is invalid, or no TLS
    /// configuration can be created.
    pub fn build(self) -> Result<Http2Client, ClientBuildError> {
        let base_url = self
            .base_url
            .as_deref()
            .map(BaseUrl::parse)
            .transpose()
            .map_err(|e| ClientBuildError::InvalidBaseUrl(e.to_string()))?;

        let mut default_headers = HeaderMap::with_capacity(self.extra_http_headers.len());
        for (name, value) in &self.extra_http_headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ClientBuildError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| ClientBuildError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            default_headers.insert(header_name, header_value);
        }

        let tls_config = match self.tls_config {
            Some(config) => config,
            None if self.ignore_https_errors => insecure_tls_config().ok_or(ClientBuildError::Tls)?,
            None => verified_tls_config().ok_or(ClientBuildError::Tls)?,
        };

        Ok(Http2Client::new(
            base_url,
            Arc::new(default_headers),
            build_https_connector(tls_config),
            self.timeout,
            self.connect_timeout,
        ))
    }
}

/// Error type for client building failures.
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    /// The base URL is not an absolute `http`/`https` URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// A default header name or value is invalid.
    #[error("invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },

    /// No crypto provider is available to build a TLS configuration.
    #[error("no TLS crypto provider available; enable `tls-ring` or `tls-aws-lc`")]
    Tls,
}
