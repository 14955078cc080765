//! TLS and TCP connector setup for sessions.
//!
//! Sessions reach their authority through an [`HttpsConnector`] that speaks
//! TLS with ALPN `h2` for `https://` and plain TCP (HTTP/2 prior knowledge)
//! for `http://`.
//!
//! # Feature Flags
//!
//! - **Crypto providers** (choose one): `tls-ring` (default with `tls`),
//!   `tls-aws-lc`. Without either, a globally installed
//!   `rustls::crypto::CryptoProvider` is used if present.
//! - **Root certificates** (choose one): `tls-native-roots` (default with
//!   `tls`), `tls-webpki-roots`.

use std::sync::Arc;

use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use rustls::ClientConfig;

/// Returns true if a crypto provider and root certificates are compiled in.
#[inline]
pub const fn has_tls_support() -> bool {
    cfg!(any(feature = "tls-ring", feature = "tls-aws-lc"))
        && cfg!(any(feature = "tls-native-roots", feature = "tls-webpki-roots"))
}

/// Pick the crypto provider for new TLS configurations.
///
/// Priority: `tls-ring`, then `tls-aws-lc`, then the process-wide default.
fn crypto_provider() -> Option<Arc<rustls::crypto::CryptoProvider>> {
    #[cfg(feature = "tls-ring")]
    return Some(Arc::new(rustls::crypto::ring::default_provider()));

    #[cfg(all(feature = "tls-aws-lc", not(feature = "tls-ring")))]
    return Some(Arc::new(rustls::crypto::aws_lc_rs::default_provider()));

    #[cfg(not(any(feature = "tls-ring", feature = "tls-aws-lc")))]
    {
        rustls::crypto::CryptoProvider::get_default().cloned()
    }
}

fn config_builder() -> Option<rustls::ConfigBuilder<ClientConfig, rustls::WantsVerifier>> {
    ClientConfig::builder_with_provider(crypto_provider()?)
        .with_safe_default_protocol_versions()
        .ok()
}

/// Build the root certificate store from enabled features.
///
/// Native roots win when both root features are enabled. With neither, the
/// store is empty and every server certificate is rejected.
fn root_store() -> rustls::RootCertStore {
    #[allow(unused_mut)]
    let mut roots = rustls::RootCertStore::empty();

    #[cfg(feature = "tls-native-roots")]
    {
        let native_certs = rustls_native_certs::load_native_certs();
        if !native_certs.errors.is_empty() {
            // Some certs may still have loaded.
            #[cfg(feature = "tracing")]
            tracing::debug!("errors loading native certs: {:?}", native_certs.errors);
        }
        roots.add_parsable_certificates(native_certs.certs);
    }

    #[cfg(all(feature = "tls-webpki-roots", not(feature = "tls-native-roots")))]
    {
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }

    roots
}

/// TLS configuration that verifies server certificates against the
/// feature-selected roots.
///
/// Returns `None` if no crypto provider is available.
pub fn verified_tls_config() -> Option<ClientConfig> {
    Some(
        config_builder()?
            .with_root_certificates(root_store())
            .with_no_client_auth(),
    )
}

/// TLS configuration that accepts any server certificate.
///
/// Backs `ignore_https_errors`. Returns `None` if no crypto provider is
/// available.
pub fn insecure_tls_config() -> Option<ClientConfig> {
    Some(
        config_builder()?
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert))
            .with_no_client_auth(),
    )
}

/// Build a plain TCP connector that also accepts `https://` URIs, so the
/// TLS layer can wrap it.
pub fn build_http_connector() -> HttpConnector {
    let mut connector = HttpConnector::new();
    connector.enforce_http(false);
    connector.set_nodelay(true);
    connector
}

/// Build the session connector for the given TLS configuration.
///
/// ALPN is restricted to `h2`; there is no HTTP/1.1 fallback.
pub fn build_https_connector(tls_config: ClientConfig) -> HttpsConnector<HttpConnector> {
    HttpsConnectorBuilder::new()
        .with_tls_config(tls_config)
        .https_or_http()
        .enable_http2()
        .wrap_connector(build_http_connector())
}

/// A certificate verifier that accepts any certificate.
///
/// Signatures are still checked with the provider's algorithms; only the
/// chain of trust and the server name are skipped.
#[derive(Debug)]
pub struct AcceptAnyServerCert;

impl rustls::client::danger::ServerCertVerifier for AcceptAnyServerCert {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &rustls::pki_types::CertificateDer<'_>,
        dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        let algorithms = signature_algorithms()?;
        rustls::crypto::verify_tls12_signature(message, cert, dss, &algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &rustls::pki_types::CertificateDer<'_>,
        dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        let algorithms = signature_algorithms()?;
        rustls::crypto::verify_tls13_signature(message, cert, dss, &algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        signature_algorithms()
            .map(|algorithms| algorithms.supported_schemes())
            .unwrap_or_default()
    }
}

fn signature_algorithms() -> Result<rustls::crypto::WebPkiSupportedAlgorithms, rustls::Error> {
    crypto_provider()
        .map(|provider| provider.signature_verification_algorithms)
        .ok_or_else(|| rustls::Error::General("no crypto provider available".into()))
}
