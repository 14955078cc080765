//! Per-request deadline.

use std::pin::Pin;
use std::time::Duration;

use tokio::time::{Instant, Sleep};

/// Deadline for one request.
///
/// Armed with a duration before the request is written; a zero duration
/// leaves it disarmed so [`TimeoutGuard::expired`] never resolves.
#[derive(Debug)]
pub(crate) struct TimeoutGuard {
    after: Duration,
    deadline: Option<Pin<Box<Sleep>>>,
}

impl TimeoutGuard {
    pub(crate) fn arm(after: Duration) -> Self {
        let deadline = (!after.is_zero())
            .then(|| Box::pin(tokio::time::sleep_until(Instant::now() + after)));
        Self { after, deadline }
    }

    /// The configured duration.
    pub(crate) fn after(&self) -> Duration {
        self.after
    }

    /// Resolves once the deadline passes. Pending forever when disarmed.
    pub(crate) async fn expired(&mut self) {
        match self.deadline.as_mut() {
            Some(sleep) => sleep.as_mut().await,
            None => std::future::pending().await,
        }
    }

    pub(crate) fn disarm(&mut self) {
        self.deadline = None;
    }
}
