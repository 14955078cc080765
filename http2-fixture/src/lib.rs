//! Minimal HTTP/2 client for Rust.
//!
//! This crate provides a small request client that speaks HTTP/2 only:
//! TLS with ALPN `h2` for `https://` and prior knowledge (h2c) for
//! `http://`. It is meant for exercising HTTP/2 endpoints from tests and
//! tooling, where a predictable one-request-one-connection model matters
//! more than throughput.
//!
//! ## Features
//!
//! - `get`, `post`, `put`, `patch`, `delete`, plus [`Http2Client::request`]
//!   for any method
//! - Text, binary and JSON request bodies with automatic `content-type`
//! - Ordered query parameters
//! - Default headers with per-request overrides
//! - Per-request timeouts (default 30 s, zero disables)
//! - Optional failure on non-ok status with a bounded body excerpt
//! - Buffered responses with explicit and scoped disposal
//!
//! ## Example
//!
//! ```ignore
//! use http2_fixture::{Http2Client, RequestOptions};
//! use serde_json::json;
//!
//! let client = Http2Client::builder()
//!     .base_url("https://localhost:3000")
//!     .ignore_https_errors(true)
//!     .build()?;
//!
//! let response = client
//!     .post_with(
//!         "/",
//!         RequestOptions::new().data(json!({"str": "it is", "num": 42, "bool": true})),
//!     )
//!     .await?;
//!
//! assert_eq!(response.status(), 201);
//! assert_eq!(response.status_text(), "Created");
//! let body: Option<serde_json::Value> = response.json()?;
//! ```
//!
//! ## Request Lifecycle
//!
//! Each request:
//!
//! 1. resolves its target: with a base URL the given string is the path,
//!    otherwise it must be an absolute URL;
//! 2. assembles its headers, query and body once;
//! 3. opens a fresh session to the target's authority;
//! 4. writes the request on a single stream and buffers the response;
//! 5. closes the session, whatever the outcome.
//!
//! Exactly one outcome is produced per request. Sessions are never pooled
//! and nothing is retried; retry policy is left to the caller.
//!
//! ## Timeouts
//!
//! The request timeout covers opening the session and the whole stream.
//! When it fires, the stream is dropped, the session closed and the request
//! fails with [`ClientError::Timeout`]:
//!
//! ```ignore
//! use std::time::Duration;
//!
//! let err = client
//!     .get_with("/slow", RequestOptions::new().timeout(Duration::from_millis(1)))
//!     .await
//!     .unwrap_err();
//! assert!(err.is_timeout());
//! ```
//!
//! A separate [`ClientBuilder::connect_timeout`] bounds session setup on its
//! own and fails with [`ClientError::Connection`].
//!
//! ## Failing on Status
//!
//! With [`RequestOptions::fail_on_status_code`], a response outside
//! `200..=399` becomes a [`ClientError::Status`]. Its message is the status
//! line, followed by the body text when there is one; body text longer
//! than 1000 characters is cut to 997 characters and `"..."`. The response
//! is disposed before the error is returned.
//!
//! ## Disposal
//!
//! ```ignore
//! let mut response = client.get("/").await?;
//! {
//!     let scoped = response.scoped();
//!     println!("{}", scoped.text());
//! } // disposed here
//! assert!(response.body().is_empty());
//!
//! response.dispose(); // no-op
//! ```
//!
//! ## Configuration
//!
//! Clients can also be described with [`ClientSettings`], which
//! deserializes from the usual fixture keys (`baseURL`,
//! `extraHTTPHeaders`, `ignoreHTTPSErrors`, `timeout`, `connectTimeout`).
//!
//! ## Feature Flags
//!
//! - `tls` (default) - `tls-ring` + `tls-native-roots`
//! - `tls-ring` / `tls-aws-lc` - crypto providers
//! - `tls-native-roots` / `tls-webpki-roots` - root certificates
//! - `tracing` (default) - an `http2.request` span per request and debug
//!   events for sessions and stream settlement

mod builder;
mod client;
pub mod config;
mod dispatch;
mod error;
pub mod request;
pub mod response;
pub mod transport;

pub use builder::{ClientBuildError, ClientBuilder, DEFAULT_TIMEOUT};
pub use client::Http2Client;
pub use error::ClientError;

pub use config::{ClientSettings, RequestOptions};
pub use response::{HeaderEntry, Response, ScopedResponse};
pub use transport::TlsClientConfig;

// Re-export core types that users need
pub use http2_fixture_core::{
    QueryParams, QueryValue, RequestBody, UNKNOWN_STATUS_TEXT, is_ok_status, status_text,
};

pub use bytes::Bytes;
pub use http::Method;
