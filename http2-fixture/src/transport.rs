//! HTTP/2 transport layer.
//!
//! This module provides the pieces a request needs to reach its authority:
//!
//! - [`Session`]: one HTTP/2 connection per request, closed on every exit path
//! - [`TransportBody`]: the outbound body written on the session's stream
//! - TLS connector setup (feature-gated crypto providers and root stores)
//!
//! # Feature Flags
//!
//! - `tls` (default) - Enables `tls-ring` + `tls-native-roots`
//! - `tls-ring` / `tls-aws-lc` - Crypto providers
//! - `tls-native-roots` / `tls-webpki-roots` - Root certificates

mod body;
mod connector;
mod session;

pub use body::TransportBody;
pub use connector::{
    AcceptAnyServerCert, build_http_connector, build_https_connector, has_tls_support,
    insecure_tls_config, verified_tls_config,
};
pub use session::{Session, SessionConnector};

// Re-export the rustls type used for custom TLS configuration
pub use rustls::ClientConfig as TlsClientConfig;
