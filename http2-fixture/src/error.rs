//! Client error types.
//!
//! This module provides [`ClientError`], the error type every request
//! resolves to when it does not produce a [`Response`](crate::Response).

use std::time::Duration;

/// Errors produced by [`Http2Client`](crate::Http2Client) requests.
///
/// Each variant is the single terminal outcome of the request that
/// produced it. Nothing is retried internally.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The session to the authority could not be established.
    #[error("connection error: {0}")]
    Connection(String),

    /// No terminal stream event arrived before the request deadline.
    #[error("request to {authority}{path} timed out after {}ms", .after.as_millis())]
    Timeout {
        authority: String,
        path: String,
        after: Duration,
    },

    /// The stream or session reported a protocol-level error.
    #[error("transport error: {0}")]
    Transport(#[source] hyper::Error),

    /// `fail_on_status_code` was set and the response was not ok.
    #[error("{message}")]
    Status {
        status: u16,
        status_text: &'static str,
        message: String,
    },

    /// The response body was not valid JSON.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The request body could not be encoded.
    #[error("encode error: {0}")]
    Encode(String),

    /// The URL, path or a header could not be turned into a request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// The response status, for [`ClientError::Status`].
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the request hit its deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout { .. })
    }

    /// Returns true if the session could not be opened.
    pub fn is_connection(&self) -> bool {
        matches!(self, ClientError::Connection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_names_target_and_duration() {
        let err = ClientError::Timeout {
            authority: "https://localhost:3000".into(),
            path: "/slow".into(),
            after: Duration::from_millis(1),
        };
        assert!(err.is_timeout());
        assert_eq!(
            err.to_string(),
            "request to https://localhost:3000/slow timed out after 1ms"
        );
    }

    #[test]
    fn test_status_error_displays_message_only() {
        let err = ClientError::Status {
            status: 500,
            status_text: "Internal Server Error",
            message: "500 Internal Server Error".into(),
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "500 Internal Server Error");
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_parse_error_from_serde() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = ClientError::from(source);
        assert!(matches!(err, ClientError::Parse(_)));
        assert!(err.to_string().starts_with("parse error: "));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_connection_error() {
        let err = ClientError::Connection("https://localhost:1: connection refused".into());
        assert!(err.is_connection());
        assert_eq!(
            err.to_string(),
            "connection error: https://localhost:1: connection refused"
        );
    }
}
