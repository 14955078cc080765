//! Local HTTP/2 fixture server.
//!
//! Serves the routes in [`routes::router`] over HTTP/2 prior knowledge
//! (h2c). Tests start an in-process instance on an ephemeral port with
//! [`FixtureServer::start`]; the `http2-fixture-test` binary serves the
//! same routes on a fixed address.

pub mod listener;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub use listener::{ConnectionStats, TrackedListener};
pub use routes::{BIG_MESSAGE_LEN, Payload, RESET_PREFIX, SLOW_DELAY, router};

/// Environment variable holding the binary's listen address.
pub const ADDR_ENV: &str = "HTTP2_FIXTURE_ADDR";

/// Listen address used when [`ADDR_ENV`] is unset.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Serve the fixture routes on `listener` until the task is dropped.
pub async fn serve(listener: TcpListener) -> anyhow::Result<()> {
    axum::serve(listener, router()).await?;
    Ok(())
}

/// An in-process fixture server. Stops when dropped.
#[derive(Debug)]
pub struct FixtureServer {
    addr: SocketAddr,
    stats: Arc<ConnectionStats>,
    handle: JoinHandle<()>,
}

impl FixtureServer {
    /// Start a server on an ephemeral localhost port.
    pub async fn start() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let listener = TrackedListener::new(listener);
        let stats = listener.stats();
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router()).await {
                tracing::error!(error = %e, "fixture server stopped");
            }
        });
        Ok(Self {
            addr,
            stats,
            handle,
        })
    }

    /// The bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// `http://127.0.0.1:{port}`
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Connections accepted so far.
    pub fn accepted_connections(&self) -> usize {
        self.stats.accepted()
    }

    /// Connections the server still holds open.
    pub fn open_connections(&self) -> usize {
        self.stats.open()
    }

    /// Wait until every accepted connection is closed.
    ///
    /// Returns false if connections are still open after `limit`.
    pub async fn wait_for_idle(&self, limit: Duration) -> bool {
        let deadline = Instant::now() + limit;
        while self.open_connections() > 0 {
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        true
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
