//! Request dispatch.
//!
//! Each request runs as one background task that owns its session and
//! stream. The task feeds stream events into an [`Exchange`], races them
//! against the request's [`TimeoutGuard`] and sends the single outcome back
//! over a oneshot channel. If the caller stops waiting, the task drops the
//! stream and closes the session without settling.

mod exchange;
mod timeout;

use std::time::Duration;

use http_body_util::BodyExt;
use hyper::body::Incoming;
use tokio::sync::oneshot;

use crate::request::PreparedRequest;
use crate::response::Response;
use crate::transport::{Session, SessionConnector, TransportBody};
use crate::ClientError;

use exchange::{Exchange, Outcome, StreamEvent};
use timeout::TimeoutGuard;

/// Everything one request needs, owned by its task.
pub(crate) struct Dispatch {
    pub(crate) request: PreparedRequest,
    pub(crate) connector: SessionConnector,
    pub(crate) connect_timeout: Option<Duration>,
    pub(crate) timeout: Duration,
    pub(crate) fail_on_status_code: bool,
}

impl Dispatch {
    /// Run the request on its own task and wait for its outcome.
    pub(crate) async fn send(self) -> Result<Response, ClientError> {
        let (tx, rx) = oneshot::channel();

        #[cfg(feature = "tracing")]
        let task = {
            use tracing::Instrument;
            let span = tracing::info_span!(
                "http2.request",
                http.method = %self.request.method(),
                http.authority = %self.request.target().authority,
                http.path = %self.request.full_path(),
                otel.kind = "client",
            );
            self.run(tx).instrument(span)
        };
        #[cfg(not(feature = "tracing"))]
        let task = self.run(tx);

        tokio::spawn(task);

        rx.await.unwrap_or_else(|_| {
            Err(ClientError::Connection(
                "request task ended without a result".to_owned(),
            ))
        })
    }

    async fn run(self, mut tx: oneshot::Sender<Outcome>) {
        let outcome = tokio::select! {
            outcome = self.drive() => outcome,
            () = tx.closed() => {
                #[cfg(feature = "tracing")]
                tracing::debug!("caller stopped waiting; request abandoned");
                return;
            }
        };
        let _ = tx.send(outcome);
    }

    async fn drive(self) -> Outcome {
        let request = self.request.to_http()?;
        let mut exchange = Exchange::new(&self.request, self.fail_on_status_code);

        let mut guard = TimeoutGuard::arm(self.timeout);
        let finished = tokio::select! {
            outcome = self.run_stream(request, &mut exchange) => Some(outcome),
            () = guard.expired() => None,
        };
        guard.disarm();

        match finished {
            Some(outcome) => outcome,
            // The stream and its session were dropped with the exchange future.
            None => exchange.time_out(guard.after()),
        }
    }

    /// Open the session, write the request and pump stream events until
    /// the exchange settles.
    async fn run_stream(
        &self,
        request: http::Request<TransportBody>,
        exchange: &mut Exchange,
    ) -> Outcome {
        let mut session = Session::open(
            &self.request.target().origin,
            &self.connector,
            self.connect_timeout,
        )
        .await?;

        debug_assert!(!exchange.is_settled());
        let outcome = {
            let mut events = StreamEvents::new(&mut session, request);
            loop {
                let event = events.next().await;
                if let Some(outcome) = exchange.handle(event) {
                    break outcome;
                }
            }
        };

        session.close();
        outcome
    }
}

/// The event sequence of one stream: headers, data chunks, then end or
/// error.
struct StreamEvents<'a> {
    session: &'a mut Session,
    request: Option<http::Request<TransportBody>>,
    body: Option<Incoming>,
}

impl<'a> StreamEvents<'a> {
    fn new(session: &'a mut Session, request: http::Request<TransportBody>) -> Self {
        Self {
            session,
            request: Some(request),
            body: None,
        }
    }

    async fn next(&mut self) -> StreamEvent {
        if let Some(request) = self.request.take() {
            return match self.session.send(request).await {
                Ok(response) => {
                    let (parts, body) = response.into_parts();
                    self.body = Some(body);
                    StreamEvent::Headers {
                        status: parts.status,
                        headers: parts.headers,
                    }
                }
                Err(err) => StreamEvent::Error(err),
            };
        }

        let Some(body) = self.body.as_mut() else {
            return StreamEvent::End;
        };
        loop {
            match body.frame().await {
                Some(Ok(frame)) => {
                    // Trailers carry nothing the response exposes.
                    if let Ok(chunk) = frame.into_data() {
                        return StreamEvent::Data(chunk);
                    }
                }
                Some(Err(err)) => {
                    self.body = None;
                    return StreamEvent::Error(ClientError::Transport(err));
                }
                None => {
                    self.body = None;
                    return StreamEvent::End;
                }
            }
        }
    }
}
