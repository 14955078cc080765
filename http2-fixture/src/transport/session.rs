//! One HTTP/2 session per request.
//!
//! A [`Session`] owns the connection to a single authority: the request
//! sender used to open its stream and the task driving the connection.
//! Sessions are never pooled. Dropping one closes it.

use std::time::Duration;

use hyper::body::Incoming;
use hyper::client::conn::http2::{self, SendRequest};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use tokio::task::JoinHandle;
use tower::ServiceExt;

use super::body::TransportBody;
use crate::ClientError;

/// Connector type shared by all sessions of a client.
pub type SessionConnector = HttpsConnector<HttpConnector>;

/// An open HTTP/2 session to one authority.
pub struct Session {
    authority: String,
    sender: Option<SendRequest<TransportBody>>,
    driver: JoinHandle<()>,
    closed: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authority", &self.authority)
            .field("closed", &self.closed)
            .finish()
    }
}

impl Session {
    /// Open a session to `authority` (`scheme://host[:port]`).
    ///
    /// Connects through `connector` (TLS with ALPN `h2` for `https`,
    /// plain TCP for `http`), performs the HTTP/2 handshake and waits until
    /// the session can accept a stream. `connect_timeout` bounds all of it.
    pub async fn open(
        authority: &str,
        connector: &SessionConnector,
        connect_timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let establish = Self::establish(authority, connector.clone());
        let session = match connect_timeout {
            Some(limit) => tokio::time::timeout(limit, establish).await.map_err(|_| {
                ClientError::Connection(format!(
                    "{authority}: connect timed out after {}ms",
                    limit.as_millis()
                ))
            })??,
            None => establish.await?,
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(authority = %session.authority, "session opened");

        Ok(session)
    }

    async fn establish(authority: &str, connector: SessionConnector) -> Result<Self, ClientError> {
        let uri: http::Uri = authority
            .parse()
            .map_err(|e| ClientError::InvalidRequest(format!("invalid authority {authority:?}: {e}")))?;

        let io = connector
            .oneshot(uri)
            .await
            .map_err(|e| ClientError::Connection(format!("{authority}: {e}")))?;

        let mut builder = http2::Builder::new(TokioExecutor::new());
        builder.timer(TokioTimer::new());
        let (mut sender, connection) = builder
            .handshake::<_, TransportBody>(io)
            .await
            .map_err(|e| ClientError::Connection(format!("{authority}: handshake failed: {e}")))?;

        let driver = tokio::spawn(async move {
            if let Err(_e) = connection.await {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %_e, "session connection ended with error");
            }
        });

        // Dropping `session` on an early return aborts the driver.
        let mut session = Session {
            authority: authority.to_owned(),
            sender: None,
            driver,
            closed: false,
        };

        sender
            .ready()
            .await
            .map_err(|e| ClientError::Connection(format!("{authority}: session not ready: {e}")))?;
        session.sender = Some(sender);

        Ok(session)
    }

    /// The authority this session is connected to.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Open the session's stream and write `request` on it.
    ///
    /// Resolves with the response headers once they arrive. The body is
    /// read from the returned [`Incoming`].
    pub async fn send(
        &mut self,
        request: http::Request<TransportBody>,
    ) -> Result<http::Response<Incoming>, ClientError> {
        let sender = self.sender.as_mut().ok_or_else(|| {
            ClientError::Connection(format!("{}: session already closed", self.authority))
        })?;
        sender.send_request(request).await.map_err(ClientError::Transport)
    }

    /// Close the session.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.sender = None;
        self.driver.abort();

        #[cfg(feature = "tracing")]
        tracing::debug!(authority = %self.authority, "session closed");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}
